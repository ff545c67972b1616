//! GraphQL request and response envelopes for the `nrql` field.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// NRQL query passed through GraphQL variables so that neither the account id
/// nor the NRQL text needs escaping into the document.
pub(crate) const NRQL_DOCUMENT: &str = "query($accountId: Int!, $nrql: Nrql!) { \
     actor { account(id: $accountId) { nrql(query: $nrql) { results } } } }";

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: NrqlVariables<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NrqlVariables<'a> {
    pub account_id: u64,
    pub nrql: &'a str,
}

/// Top-level GraphQL response. `data` and `errors` may both be present.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<ActorData>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ActorData {
    pub actor: Option<Actor>,
}

#[derive(Debug, Deserialize)]
pub struct Actor {
    pub account: Option<Account>,
}

#[derive(Debug, Deserialize)]
pub struct Account {
    pub nrql: Option<NrqlResult>,
}

#[derive(Debug, Deserialize)]
pub struct NrqlResult {
    #[serde(default)]
    pub results: Vec<Value>,
}

impl GraphQlResponse {
    /// The `actor.account.nrql.results` rows, if the path is present.
    #[must_use]
    pub fn into_results(self) -> Option<Vec<Value>> {
        self.data?.actor?.account?.nrql.map(|n| n.results)
    }
}
