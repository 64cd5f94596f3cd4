use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{
    config::Region,
    error::DisplayErrorContext,
    operation::query::builders::QueryFluentBuilder,
    types::{
        AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType, ReturnValue,
        ScalarAttributeType, TableStatus,
    },
    Client,
};
use domain::{NewTodo, TodoChanges, TodoId, TodoRecord};
use shared::Config;
use std::time::Duration;
use tracing::{debug, info};

use crate::models::{item_to_record, record_to_item, DynamoDbKeys};
use crate::{StoreError, StoreResult, TodoStore};

const TABLE_READY_ATTEMPTS: u32 = 30;
const TABLE_READY_INTERVAL: Duration = Duration::from_millis(500);

/// DynamoDB 上の 1 コレクションを扱うストア
#[derive(Clone)]
pub struct DynamoTodoStore {
    client: Client,
    table_name: String,
    collection: String,
}

impl DynamoTodoStore {
    /// 接続文字列（エンドポイント URL）とリージョンからクライアントを作り、テーブルを用意する
    pub async fn connect(config: &Config) -> StoreResult<Self> {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(&config.store_uri)
            .region(Region::new(config.aws_region.clone()))
            .load()
            .await;

        let store = Self::new(
            Client::new(&aws_config),
            &config.database,
            &config.collection,
        );
        store.ensure_table().await?;

        info!(
            endpoint = %config.store_uri,
            table = %store.table_name,
            collection = %store.collection,
            "Connected to DynamoDB"
        );

        Ok(store)
    }

    pub fn new(client: Client, table_name: &str, collection: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            collection: collection.to_string(),
        }
    }

    /// テーブルが存在しなければ作成し、ACTIVE になるまで待つ
    pub async fn ensure_table(&self) -> StoreResult<()> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => return Ok(()),
            Err(err) => {
                let service_error = err.into_service_error();
                if !service_error.is_resource_not_found_exception() {
                    return Err(sdk_error(service_error));
                }
            }
        }

        info!(table = %self.table_name, "Creating table");
        self.create_table().await?;
        self.wait_until_active().await
    }

    async fn create_table(&self) -> StoreResult<()> {
        let result = self
            .client
            .create_table()
            .table_name(&self.table_name)
            .billing_mode(BillingMode::PayPerRequest)
            .attribute_definitions(string_attribute("PK")?)
            .attribute_definitions(string_attribute("SK")?)
            .key_schema(key_element("PK", KeyType::Hash)?)
            .key_schema(key_element("SK", KeyType::Range)?)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.is_resource_in_use_exception() {
                    // 別プロセスが先に作成を始めている
                    debug!(table = %self.table_name, "Table is already being created");
                    Ok(())
                } else {
                    Err(sdk_error(service_error))
                }
            }
        }
    }

    async fn wait_until_active(&self) -> StoreResult<()> {
        for _ in 0..TABLE_READY_ATTEMPTS {
            let output = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await
                .map_err(sdk_error)?;

            if output.table().and_then(|t| t.table_status()) == Some(&TableStatus::Active) {
                return Ok(());
            }
            tokio::time::sleep(TABLE_READY_INTERVAL).await;
        }

        Err(StoreError::DynamoDb(format!(
            "table {} did not become active",
            self.table_name
        )))
    }

    /// コレクション全件のクエリ。書き込み直後の一覧にも反映されるよう強い整合性で読む
    fn collection_query(&self, pk: &str) -> QueryFluentBuilder {
        self.client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk")
            .expression_attribute_values(":pk", AttributeValue::S(pk.to_string()))
            .consistent_read(true)
    }
}

#[async_trait]
impl TodoStore for DynamoTodoStore {
    async fn find_all(&self) -> StoreResult<Vec<TodoRecord>> {
        let pk = DynamoDbKeys::collection_pk(&self.collection);
        let mut records = Vec::new();
        let mut start_key = None;

        // API にページングはないが、DynamoDB の 1MB 単位のページは最後まで辿る
        loop {
            let output = self
                .collection_query(&pk)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(sdk_error)?;

            for item in output.items() {
                records.push(item_to_record(item)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        debug!(count = records.len(), "Fetched todos");
        Ok(records)
    }

    async fn insert(&self, todo: NewTodo) -> StoreResult<TodoId> {
        let record = todo.into_record(TodoId::new());

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(&self.collection, &record)))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(sdk_error)?;

        info!(todo_id = %record.id, "Todo saved");
        Ok(record.id)
    }

    async fn delete_by_id(&self, id: &TodoId) -> StoreResult<u64> {
        let keys = DynamoDbKeys::for_todo(&self.collection, id);

        let output = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(keys.to_key_map()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(sdk_error)?;

        let deleted = match output.attributes() {
            Some(old) if !old.is_empty() => 1,
            _ => 0,
        };
        debug!(todo_id = %id, deleted, "Todo delete finished");
        Ok(deleted)
    }

    async fn update_by_id(&self, id: &TodoId, changes: &TodoChanges) -> StoreResult<u64> {
        let keys = DynamoDbKeys::for_todo(&self.collection, id);

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(keys.to_key_map()))
            .update_expression("SET #title = :title, #completed = :completed")
            .condition_expression("attribute_exists(PK)")
            .expression_attribute_names("#title", "title")
            .expression_attribute_names("#completed", "completed")
            .expression_attribute_values(":title", AttributeValue::S(changes.title.clone()))
            .expression_attribute_values(":completed", AttributeValue::Bool(changes.completed))
            .send()
            .await;

        match result {
            Ok(_) => {
                debug!(todo_id = %id, "Todo updated");
                Ok(1)
            }
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    // 対象が存在しない
                    Ok(0)
                } else {
                    Err(sdk_error(service_error))
                }
            }
        }
    }
}

fn string_attribute(name: &str) -> StoreResult<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(sdk_error)
}

fn key_element(name: &str, key_type: KeyType) -> StoreResult<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(sdk_error)
}

fn sdk_error<E: std::error::Error>(err: E) -> StoreError {
    StoreError::DynamoDb(DisplayErrorContext(err).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> Client {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        Client::from_conf(config)
    }

    #[tokio::test]
    async fn test_collection_query_is_strongly_consistent() {
        let store = DynamoTodoStore::new(offline_client(), "demo_todo", "todo");
        let pk = DynamoDbKeys::collection_pk("todo");

        let query = store.collection_query(&pk);

        assert_eq!(query.get_consistent_read(), &Some(true));
        assert_eq!(query.get_table_name().as_deref(), Some("demo_todo"));
        assert_eq!(
            query
                .get_expression_attribute_values()
                .as_ref()
                .and_then(|values| values.get(":pk")),
            Some(&AttributeValue::S(pk))
        );
    }
}
