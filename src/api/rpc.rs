use jsonrpsee::{core::RpcResult, proc_macros::rpc};

use crate::form::{Submission, SubmitOutcome};
use crate::models::ConfigurationState;

#[rpc(client, server)]
pub trait Api {
    /// Persisted configuration state
    #[method(name = "show_config")]
    async fn show_config(&self) -> RpcResult<ConfigurationState>;
    /// Document for the persisted state
    #[method(name = "render")]
    async fn render(&self) -> RpcResult<String>;
    /// Document for an unsaved state, nothing is stored
    #[method(name = "preview")]
    async fn preview(&self, state: ConfigurationState) -> RpcResult<String>;
    #[method(name = "remove_static")]
    async fn remove_static(&self, prefix: String) -> RpcResult<ConfigurationState>;
    #[method(name = "remove_prefix")]
    async fn remove_prefix(&self, index: usize) -> RpcResult<ConfigurationState>;
    #[method(name = "submit_form")]
    async fn submit_form(&self, submission: Submission) -> RpcResult<SubmitOutcome>;
    /// Replace everything with the canned example, keeping nothing
    #[method(name = "load_example")]
    async fn load_example(&self) -> RpcResult<ConfigurationState>;
}
