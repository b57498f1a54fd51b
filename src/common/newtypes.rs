use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

macro_rules! remote_id {
    ($($name:ident),*) => {
        $(
            #[derive(
                Debug,
                Copy,
                Clone,
                Hash,
                Eq,
                PartialEq,
                Ord,
                PartialOrd,
                Default,
                Serialize,
                Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub i64);

            impl Display for $name {
                fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

remote_id!(SiteId, PostId, CommentId, UserId);
