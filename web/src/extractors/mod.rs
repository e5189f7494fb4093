pub(crate) mod authenticated_user;
pub(crate) mod valid_json;

type RejectionType = crate::Error;
