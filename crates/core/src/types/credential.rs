//! Login credentials and the stores each one is bound to.

use secrecy::SecretString;

use super::id::StoreId;
use super::role::Role;

/// An account the load test can log in as.
///
/// The store list mirrors the backend's `accessibleLocationIds` for the
/// account: a salesperson owns exactly one store, a central manager sees the
/// whole catalog. The constructors are the only way to build a credential,
/// so that shape holds for every value.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct Credential {
    account: String,
    password: SecretString,
    role: Role,
    stores: Vec<StoreId>,
}

impl Credential {
    /// A salesperson credential bound to a single store.
    pub fn sales(
        account: impl Into<String>,
        password: impl Into<String>,
        store: StoreId,
    ) -> Self {
        Self {
            account: account.into(),
            password: SecretString::from(password.into()),
            role: Role::Sales,
            stores: vec![store],
        }
    }

    /// A central-manager credential with access to every store in `catalog`.
    pub fn central_manager(
        account: impl Into<String>,
        password: impl Into<String>,
        catalog: &[StoreId],
    ) -> Self {
        Self {
            account: account.into(),
            password: SecretString::from(password.into()),
            role: Role::CentralManager,
            stores: catalog.to_vec(),
        }
    }

    /// Login account name.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Login password.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }

    /// Role requested at login.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Stores this account may query.
    #[must_use]
    pub fn stores(&self) -> &[StoreId] {
        &self.stores
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("account", &self.account)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("stores", &self.stores)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_sales_credential_has_one_store() {
        let cred = Credential::sales("east", "123456", StoreId::new("STORE-EAST-01"));
        assert_eq!(cred.role(), Role::Sales);
        assert_eq!(cred.stores(), &[StoreId::new("STORE-EAST-01")]);
        assert_eq!(cred.password().expose_secret(), "123456");
    }

    #[test]
    fn test_manager_credential_copies_catalog() {
        let catalog = vec![StoreId::new("A"), StoreId::new("B")];
        let cred = Credential::central_manager("boss", "pw", &catalog);
        assert_eq!(cred.role(), Role::CentralManager);
        assert_eq!(cred.stores(), catalog.as_slice());
    }

    #[test]
    fn test_debug_redacts_password() {
        let cred = Credential::sales("east", "hunter2-secret", StoreId::new("S"));
        let debug_output = format!("{cred:?}");
        assert!(debug_output.contains("east"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2-secret"));
    }
}
