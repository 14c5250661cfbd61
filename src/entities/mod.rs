use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

pub mod artist;
pub mod show;
pub mod venue;

/// Ordered list of free-text tags, stored as a JSON array in a TEXT column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct StringVec(pub Vec<String>);

impl From<Vec<String>> for StringVec {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}
