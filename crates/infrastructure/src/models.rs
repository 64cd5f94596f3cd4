use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use domain::{TodoId, TodoRecord};
use std::collections::HashMap;

use crate::StoreError;

/// DynamoDB Single Table Design のキー構造
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbKeys {
    pub pk: String, // パーティションキー
    pub sk: String, // ソートキー
}

impl DynamoDbKeys {
    /// コレクション全体のパーティションキー
    pub fn collection_pk(collection: &str) -> String {
        format!("COLLECTION#{collection}")
    }

    pub fn for_todo(collection: &str, todo_id: &TodoId) -> Self {
        Self {
            pk: Self::collection_pk(collection),
            sk: format!("TODO#{todo_id}"),
        }
    }

    pub fn to_key_map(&self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("PK".to_string(), AttributeValue::S(self.pk.clone())),
            ("SK".to_string(), AttributeValue::S(self.sk.clone())),
        ])
    }
}

/// TodoRecord を DynamoDB アイテムに変換
pub fn record_to_item(collection: &str, record: &TodoRecord) -> HashMap<String, AttributeValue> {
    let mut item = DynamoDbKeys::for_todo(collection, &record.id).to_key_map();
    item.insert("id".to_string(), AttributeValue::S(record.id.to_string()));
    item.insert("title".to_string(), AttributeValue::S(record.title.clone()));
    item.insert("completed".to_string(), AttributeValue::Bool(record.completed));
    item.insert(
        "created_at".to_string(),
        AttributeValue::S(record.created_at.to_rfc3339()),
    );
    item
}

/// DynamoDB アイテムから TodoRecord を復元。欠損や型違いはデコードエラー
pub fn item_to_record(item: &HashMap<String, AttributeValue>) -> Result<TodoRecord, StoreError> {
    let id = string_attr(item, "id")?;
    let created_at = string_attr(item, "created_at")?;

    Ok(TodoRecord {
        id: TodoId::parse(id).map_err(|e| StoreError::Decode(e.to_string()))?,
        title: string_attr(item, "title")?.to_string(),
        completed: *item
            .get("completed")
            .ok_or_else(|| missing("completed"))?
            .as_bool()
            .map_err(|_| wrong_type("completed"))?,
        created_at: DateTime::parse_from_rfc3339(created_at)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| StoreError::Decode(format!("created_at: {e}")))?,
    })
}

fn string_attr<'a>(
    item: &'a HashMap<String, AttributeValue>,
    name: &'static str,
) -> Result<&'a str, StoreError> {
    item.get(name)
        .ok_or_else(|| missing(name))?
        .as_s()
        .map(String::as_str)
        .map_err(|_| wrong_type(name))
}

fn missing(name: &str) -> StoreError {
    StoreError::Decode(format!("missing attribute {name}"))
}

fn wrong_type(name: &str) -> StoreError {
    StoreError::Decode(format!("unexpected type for attribute {name}"))
}
