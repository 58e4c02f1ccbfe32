use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{
    config::Region, error::DisplayErrorContext, primitives::Blob, types::AttributeValue, Client,
};
use serde_json::{Number, Value};
use tracing::{info, warn};

use crate::{
    config::Config,
    domain::expense::{
        Expense, ExpenseChanges, ExpenseItem, AMOUNT_ATTRIBUTE, CATEGORY_ATTRIBUTE,
        EXPENSE_ID_ATTRIBUTE, NAME_ATTRIBUTE,
    },
    errors::AppError,
    expense_store::ExpenseStore,
};

type Item = HashMap<String, AttributeValue>;

const UPDATE_EXPRESSION: &str = "SET #name = :name, #amount = :amount, #category = :category";
const UPDATE_CONDITION: &str = "attribute_exists(#id)";

#[derive(Debug, Clone)]
pub struct DynamoExpenseStore {
    client: Client,
    table_name: String,
}

impl DynamoExpenseStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Builds the one client this process uses, from the ambient AWS
    /// credential chain plus the configured region and endpoint.
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.dynamodb_endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let sdk_config = loader.load().await;

        info!(
            table = %config.table_name,
            region = %config.region,
            endpoint = config.dynamodb_endpoint.as_deref().unwrap_or("default"),
            "dynamodb client configured"
        );

        Self::new(Client::new(&sdk_config), config.table_name.clone())
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub async fn ensure_table_available(&self) -> Result<(), AppError> {
        self.client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|err| storage_error("describe-table", err))?;
        Ok(())
    }
}

#[async_trait]
impl ExpenseStore for DynamoExpenseStore {
    async fn scan_all(&self) -> Result<Vec<ExpenseItem>, AppError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(|err| storage_error("scan", err))?;

        if output.last_evaluated_key.is_some() {
            warn!(table = %self.table_name, "scan returned a partial page of expenses");
        }

        Ok(output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(item_to_document)
            .collect())
    }

    async fn put_item(&self, expense: &Expense) -> Result<(), AppError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(document_to_item(expense.to_item())))
            .send()
            .await
            .map_err(|err| storage_error("put-item", err))?;
        Ok(())
    }

    async fn update_item(&self, changes: &ExpenseChanges) -> Result<(), AppError> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(
                EXPENSE_ID_ATTRIBUTE,
                AttributeValue::S(changes.expense_id.clone()),
            )
            .update_expression(UPDATE_EXPRESSION)
            .condition_expression(UPDATE_CONDITION)
            .expression_attribute_names("#id", EXPENSE_ID_ATTRIBUTE)
            .expression_attribute_names("#name", NAME_ATTRIBUTE)
            .expression_attribute_names("#amount", AMOUNT_ATTRIBUTE)
            .expression_attribute_names("#category", CATEGORY_ATTRIBUTE)
            .expression_attribute_values(":name", json_to_attribute(changes.name.clone()))
            .expression_attribute_values(":amount", json_to_attribute(changes.amount.clone()))
            .expression_attribute_values(
                ":category",
                json_to_attribute(changes.category.clone()),
            )
            .send()
            .await
            .map_err(|err| storage_error("update-item", err))?;
        Ok(())
    }

    async fn delete_item(&self, expense_id: &str) -> Result<(), AppError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(EXPENSE_ID_ATTRIBUTE, AttributeValue::S(expense_id.to_string()))
            .send()
            .await
            .map_err(|err| storage_error("delete-item", err))?;
        Ok(())
    }
}

fn storage_error<E>(operation: &'static str, err: E) -> AppError
where
    E: std::error::Error,
{
    AppError::storage(operation, DisplayErrorContext(err).to_string())
}

fn document_to_item(document: ExpenseItem) -> Item {
    document
        .into_iter()
        .map(|(name, value)| (name, json_to_attribute(value)))
        .collect()
}

fn item_to_document(item: Item) -> ExpenseItem {
    item.into_iter()
        .map(|(name, attribute)| (name, attribute_to_json(attribute)))
        .collect()
}

fn json_to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text),
        Value::Array(values) => {
            AttributeValue::L(values.into_iter().map(json_to_attribute).collect())
        }
        Value::Object(fields) => AttributeValue::M(document_to_item(fields)),
    }
}

/// Decodes one stored attribute. Never fails: a row the table accepted is
/// always listed, whatever its shape.
fn attribute_to_json(attribute: AttributeValue) -> Value {
    match attribute {
        AttributeValue::S(text) => Value::String(text),
        AttributeValue::N(number) => parse_number(number),
        AttributeValue::Bool(flag) => Value::Bool(flag),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(values) => {
            Value::Array(values.into_iter().map(attribute_to_json).collect())
        }
        AttributeValue::M(fields) => Value::Object(item_to_document(fields)),
        AttributeValue::Ss(values) => Value::Array(values.into_iter().map(Value::String).collect()),
        AttributeValue::Ns(values) => Value::Array(values.into_iter().map(parse_number).collect()),
        AttributeValue::B(blob) => blob_to_json(blob),
        AttributeValue::Bs(blobs) => Value::Array(blobs.into_iter().map(blob_to_json).collect()),
        other => {
            warn!(attribute = ?other, "listing unrecognised attribute type as null");
            Value::Null
        }
    }
}

fn blob_to_json(blob: Blob) -> Value {
    Value::Array(blob.into_inner().into_iter().map(Value::from).collect())
}

/// Keeps integers integral: `950` lists as `950`, not `950.0`.
fn parse_number(raw: String) -> Value {
    if let Ok(integer) = raw.parse::<i64>() {
        return Value::from(integer);
    }
    if let Ok(integer) = raw.parse::<u64>() {
        return Value::from(integer);
    }

    match raw.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(number) => Value::Number(number),
        None => Value::String(raw),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn coffee_item() -> Item {
        HashMap::from([
            (
                EXPENSE_ID_ATTRIBUTE.to_string(),
                AttributeValue::S("1".to_string()),
            ),
            (
                NAME_ATTRIBUTE.to_string(),
                AttributeValue::S("Coffee".to_string()),
            ),
            (
                AMOUNT_ATTRIBUTE.to_string(),
                AttributeValue::N("4.5".to_string()),
            ),
            (
                CATEGORY_ATTRIBUTE.to_string(),
                AttributeValue::S("Food".to_string()),
            ),
        ])
    }

    fn expense(body: Value) -> Expense {
        serde_json::from_value(body).expect("valid expense")
    }

    #[test]
    fn encodes_expense_as_document_item() {
        let item = document_to_item(
            expense(json!({"ExpenseID":"1","Name":"Coffee","Amount":4.5,"Category":"Food"}))
                .to_item(),
        );
        assert_eq!(item, coffee_item());
    }

    #[test]
    fn decodes_scanned_item() {
        assert_eq!(
            Value::Object(item_to_document(coffee_item())),
            json!({"ExpenseID":"1","Name":"Coffee","Amount":4.5,"Category":"Food"})
        );
    }

    #[test]
    fn integer_amounts_round_trip_unchanged() {
        let body = json!({"ExpenseID":"2","Name":"Rent","Amount":950,"Category":"Housing"});

        let item = document_to_item(expense(body.clone()).to_item());
        assert_eq!(item[AMOUNT_ATTRIBUTE], AttributeValue::N("950".to_string()));
        assert_eq!(Value::Object(item_to_document(item)), body);
    }

    #[test]
    fn large_integers_keep_precision() {
        assert_eq!(
            parse_number("9007199254740993".to_string()),
            json!(9_007_199_254_740_993_u64)
        );
        assert_eq!(
            parse_number("18446744073709551615".to_string()),
            json!(u64::MAX)
        );
    }

    #[test]
    fn nonconforming_rows_are_listed_as_stored() {
        let mut item = coffee_item();
        item.insert(AMOUNT_ATTRIBUTE.to_string(), AttributeValue::S("4.5".to_string()));
        item.remove(NAME_ATTRIBUTE);

        assert_eq!(
            Value::Object(item_to_document(item)),
            json!({"ExpenseID":"1","Amount":"4.5","Category":"Food"})
        );
    }

    #[test]
    fn nested_attributes_survive() {
        let body = json!({
            "ExpenseID": "2",
            "Name": "Hotel",
            "Amount": 120.25,
            "Receipt": {"paid": true, "tags": ["work", "q3"], "refund": null}
        });

        let item = document_to_item(expense(body.clone()).to_item());
        let AttributeValue::M(receipt) = &item["Receipt"] else {
            panic!("receipt should encode as a map");
        };
        assert_eq!(receipt["paid"], AttributeValue::Bool(true));
        assert_eq!(receipt["refund"], AttributeValue::Null(true));

        assert_eq!(Value::Object(item_to_document(item)), body);
    }

    #[test]
    fn sets_and_binary_decode_as_arrays() {
        let mut item = coffee_item();
        item.insert(
            "Tags".to_string(),
            AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]),
        );
        item.insert(
            "Splits".to_string(),
            AttributeValue::Ns(vec!["1".to_string(), "2.5".to_string()]),
        );
        item.insert("Raw".to_string(), AttributeValue::B(Blob::new(vec![1u8, 2])));

        let document = item_to_document(item);
        assert_eq!(document["Tags"], json!(["a", "b"]));
        assert_eq!(document["Splits"], json!([1, 2.5]));
        assert_eq!(document["Raw"], json!([1, 2]));
    }

    #[test]
    fn update_values_are_forwarded_as_sent() {
        assert_eq!(
            json_to_attribute(json!("2.5")),
            AttributeValue::S("2.5".to_string())
        );
        assert_eq!(json_to_attribute(json!(3)), AttributeValue::N("3".to_string()));
    }
}
