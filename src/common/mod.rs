pub mod comment;
pub mod like;
pub mod newtypes;

/// Version segment of the REST API, prefixed to every endpoint path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiVersion {
    V1_1,
    V1_2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1_1 => "v1.1",
            ApiVersion::V1_2 => "v1.2",
        }
    }
}
