use crate::api::ApiContext;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    /// When set, every table request must carry a matching `apikey` header.
    pub(crate) api_key: Option<String>,
}
