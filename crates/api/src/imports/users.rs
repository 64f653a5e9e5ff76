use scylla_core::error::CoreError;
use scylla_core::import::{ImportSchema, RuleTable};
use scylla_core::sheet::Row;
use scylla_db::models::user::CreateUser;

use crate::auth::password::hash_password;

/// Sheet layout: `username | email | password`.
const RULES: &[(usize, &str)] = &[
    (0, "username,required"),
    (1, "email,required,unique"),
    (2, "password,required"),
];

/// User import. Passwords arrive in plain text and are hashed on the way in.
#[derive(Debug)]
pub struct UserSheet {
    rules: RuleTable,
}

impl UserSheet {
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self {
            rules: RuleTable::from_specs(RULES)?,
        })
    }
}

impl ImportSchema for UserSheet {
    type Record = CreateUser;

    fn table(&self) -> &'static str {
        "users"
    }

    fn rules(&self) -> &RuleTable {
        &self.rules
    }

    fn materialize(&self, row: &Row) -> Result<CreateUser, String> {
        let password_hash = hash_password(row.cell(2)).map_err(|e| e.to_string())?;
        Ok(CreateUser {
            username: row.cell(0).to_string(),
            email: row.cell(1).to_string(),
            password_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::password::verify_password;

    use super::*;

    #[test]
    fn only_email_is_unique() {
        let sheet = UserSheet::new().unwrap();
        assert_eq!(sheet.rules().unique_fields().collect::<Vec<_>>(), vec!["email"]);
        assert_eq!(sheet.rules().columns().len(), 3);
    }

    #[test]
    fn materialize_hashes_password() {
        let sheet = UserSheet::new().unwrap();
        let row = Row::new(
            2,
            vec!["alice".into(), "a@x.com".into(), "hunter22".into()],
        );

        let user = sheet.materialize(&row).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "a@x.com");
        assert_ne!(user.password_hash, "hunter22");
        assert!(verify_password("hunter22", &user.password_hash).unwrap());
    }
}
