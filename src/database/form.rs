use std::{collections::HashMap, str::FromStr};

use serde_json::Value;

use super::error::{Error, TypeError};

pub type FormData = HashMap<String, Value>;

/// Loosely-typed request body, keyed field access with explicit conversion
/// errors instead of framework-driven declarative validation.
pub struct Form {
    inner: HashMap<String, Value>,
}

impl Form {
    pub fn from_data(data: FormData) -> Self {
        Self { inner: data }
    }

    pub fn get_value<T>(&self, key: &str) -> Result<T, Error>
    where
        T: TryFrom<Value>,
    {
        match self.inner.get(key) {
            Some(value) => value
                .to_owned()
                .try_into()
                .map_err(|_e| TypeError::new("Invalid type conversion").into()),
            None => Err(TypeError::new("Invalid key").into()),
        }
    }

    pub fn get_number<T>(&self, key: &str) -> Result<T, Error>
    where
        T: FromStr,
    {
        match self.inner.get(key) {
            Some(value) => match value.as_i64() {
                Some(v) => v
                    .to_string()
                    .parse()
                    .map_err(|_e| TypeError::new("Invalid type conversion").into()),
                None => match value.as_str() {
                    Some(v) => v
                        .to_owned()
                        .parse()
                        .map_err(|_e| TypeError::new("Invalid type conversion").into()),
                    None => Err(TypeError::new("Failed to parse value as number").into()),
                },
            },
            None => Err(TypeError::new("Invalid key").into()),
        }
    }

    pub fn get_str(&self, key: &str) -> Result<String, TypeError> {
        match self.inner.get(key) {
            Some(value) => match value.as_str() {
                Some(v) => Ok(v.to_string()),
                None => Err(TypeError::new("Invalid key")),
            },
            None => Err(TypeError::new("Invalid key")),
        }
    }

    /// Deserializes an array field into a typed list.
    pub fn get_list<T>(&self, key: &str) -> Result<Vec<T>, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.inner.get(key) {
            Some(value) if value.is_array() => serde_json::from_value(value.to_owned())
                .map_err(|_e| TypeError::new("Invalid list item").into()),
            Some(_) => Err(TypeError::new("Expected an array").into()),
            None => Err(TypeError::new("Invalid key").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RecipeIngredientSpec;
    use serde_json::json;

    fn form(value: Value) -> Form {
        let data = value
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Form::from_data(data)
    }

    #[test]
    fn reads_strings_and_numbers() {
        let form = form(json!({"name": "Omelette", "cooking_time": 15, "page": "3"}));

        assert_eq!(form.get_str("name").unwrap(), "Omelette");
        assert_eq!(form.get_number::<i32>("cooking_time").unwrap(), 15);
        assert_eq!(form.get_number::<i64>("page").unwrap(), 3);
    }

    #[test]
    fn missing_or_mistyped_keys_fail() {
        let form = form(json!({"cooking_time": "soon"}));

        assert!(form.get_str("name").is_err());
        assert!(form.get_number::<i32>("cooking_time").is_err());
    }

    #[test]
    fn reads_typed_lists() {
        let form = form(json!({
            "ingredients": [{"id": 2, "amount": 100}, {"id": 5, "amount": 3}],
            "tags": [1, 4],
        }));

        let parts: Vec<RecipeIngredientSpec> = form.get_list("ingredients").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].id, 2);
        assert_eq!(parts[1].amount, 3);

        let tags: Vec<i32> = form.get_list("tags").unwrap();
        assert_eq!(tags, vec![1, 4]);

        assert!(form.get_list::<i32>("ingredients").is_err());
    }
}
