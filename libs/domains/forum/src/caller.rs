use axum_helpers::CurrentUser;
use std::str::FromStr;
use uuid::Uuid;

use crate::users::Role;

/// The authenticated identity a service operation runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn user(id: Uuid) -> Self {
        Self::new(id, Role::User)
    }

    pub fn sys_admin(id: Uuid) -> Self {
        Self::new(id, Role::SysAdmin)
    }

    pub fn is_sys_admin(&self) -> bool {
        self.role == Role::SysAdmin
    }
}

// Unknown roles get the least privilege
impl From<CurrentUser> for Caller {
    fn from(user: CurrentUser) -> Self {
        let role = Role::from_str(&user.role).unwrap_or(Role::User);
        Self::new(user.id, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_current_user() {
        let id = Uuid::now_v7();

        assert!(Caller::from(CurrentUser::new(id, "sys_admin")).is_sys_admin());
        assert_eq!(Caller::from(CurrentUser::new(id, "user")).role, Role::User);
        assert_eq!(Caller::from(CurrentUser::new(id, "root")).role, Role::User);
    }
}
