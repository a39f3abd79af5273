use uuid::Uuid;

use crate::modules::auth::application::domain::entities::User;

/// HTTP verbs collapse into two classes for authorization purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodClass {
    /// GET, HEAD, OPTIONS
    Safe,
    /// POST, PATCH, DELETE
    Unsafe,
}

/// The three access rules of the API, dispatched by resource kind.
///
/// Every check is a pure function of the caller, the method class, and (for
/// owned resources) the owner id. Checks run on each request; nothing is
/// cached between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// User-account administration.
    AdminOnly,
    /// Category / Genre / Title mutation.
    AdminOrReadOnly,
    /// Review / Comment mutation.
    AuthorOrModerator,
}

impl Policy {
    pub fn allows(&self, caller: Option<&User>, method: MethodClass, owner: Option<Uuid>) -> bool {
        match self {
            Policy::AdminOnly => caller.is_some_and(|u| u.is_admin()),
            Policy::AdminOrReadOnly => {
                method == MethodClass::Safe || caller.is_some_and(|u| u.is_admin())
            }
            Policy::AuthorOrModerator => {
                method == MethodClass::Safe
                    || caller.is_some_and(|u| {
                        owner == Some(u.id) || u.is_moderator() || u.is_admin()
                    })
            }
        }
    }
}
