//! Owner and group name resolution.
//!
//! [EntryInfo](crate::core::EntryInfo) never talks to the user database directly.
//! It asks an [IdentityLookup], which lets tests swap in a fixed table.

/// Resolves numeric user and group ids to names.
pub trait IdentityLookup {
    fn user_name(&self, uid: u32) -> Option<String>;
    fn group_name(&self, gid: u32) -> Option<String>;
}

/// Looks names up in the system user and group databases on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIdentity;

impl IdentityLookup for SystemIdentity {
    fn user_name(&self, uid: u32) -> Option<String> {
        users::get_user_by_uid(uid).map(|u| u.name().to_string_lossy().into_owned())
    }

    fn group_name(&self, gid: u32) -> Option<String> {
        users::get_group_by_gid(gid).map(|g| g.name().to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_user_resolves() {
        let uid = users::get_current_uid();
        let name = SystemIdentity.user_name(uid);
        assert_eq!(
            name,
            users::get_current_username().map(|n| n.to_string_lossy().into_owned())
        );
    }
}
