use serde::{Deserialize, Serialize};

/// One row of a `columns=name` listing.
#[derive(Deserialize, Debug)]
pub struct NamedResource {
    #[serde(default)]
    pub name: Option<String>,
}

/// `columns=messages` projection of a single queue. A freshly declared
/// queue has no counter until the broker emits its first stats.
#[derive(Deserialize, Debug)]
pub struct QueueMessages {
    #[serde(default)]
    pub messages: u64,
}

#[derive(Serialize, Debug, Default)]
pub struct DeclareQueue {}

#[derive(Serialize, Debug)]
pub struct DeclareExchange<'a> {
    #[serde(rename = "type")]
    pub exchange_type: &'a str,
}
