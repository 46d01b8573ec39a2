//! Static test data: stores, products and the credential table.
//!
//! The built-in table matches the accounts seeded by the backend's user
//! initialisation script. Each salesperson is bound to the one store the
//! backend lists in its `accessibleLocationIds`; querying any other store
//! is a guaranteed 403, which is not what the load test is measuring.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{Credential, ProductId, Role, StoreId};

/// Every store location known to the backend.
pub const STORE_IDS: [&str; 8] = [
    "STORE-EAST-01",
    "STORE-EAST-02",
    "STORE-WEST-01",
    "STORE-WEST-02",
    "STORE-NORTH-01",
    "STORE-NORTH-02",
    "STORE-SOUTH-01",
    "STORE-SOUTH-02",
];

/// Products that synthetic orders are drawn from.
pub const PRODUCT_IDS: [&str; 6] = [
    "PROD-001", "PROD-002", "PROD-003", "PROD-004", "PROD-005", "PROD-006",
];

/// Password shared by all seeded load-test accounts.
const SEEDED_PASSWORD: &str = "123456";

/// The full store catalog.
#[must_use]
pub fn store_catalog() -> Vec<StoreId> {
    STORE_IDS.iter().copied().map(StoreId::from).collect()
}

/// The full product catalog.
#[must_use]
pub fn product_catalog() -> Vec<ProductId> {
    PRODUCT_IDS.iter().copied().map(ProductId::from).collect()
}

/// Errors raised while building or loading a [`CredentialTable`].
#[derive(Debug, Error)]
pub enum CredentialTableError {
    /// The table has no account for a role the scenario needs.
    #[error("no credentials for role {0}")]
    NoCredentials(Role),

    /// A salesperson entry does not name exactly one store.
    #[error("sales account {account} must be bound to exactly one store (got {count})")]
    SalesStoreCount {
        /// Offending account.
        account: String,
        /// Number of stores listed.
        count: usize,
    },

    /// An entry names a store outside the catalog.
    #[error("account {account} references unknown store {store}")]
    UnknownStore {
        /// Offending account.
        account: String,
        /// Store id not present in the catalog.
        store: String,
    },

    /// The same account appears twice.
    #[error("duplicate account: {0}")]
    DuplicateAccount(String),

    /// The credentials file is not valid YAML for the expected shape.
    #[error("invalid credentials file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// One entry of a credentials file.
#[derive(Debug, Deserialize)]
struct CredentialEntry {
    account: String,
    password: String,
    role: Role,
    #[serde(default)]
    stores: Vec<String>,
}

/// Accounts grouped by role, validated against the store catalog.
#[derive(Debug, Clone)]
pub struct CredentialTable {
    sales: Vec<Credential>,
    managers: Vec<Credential>,
}

impl CredentialTable {
    /// The seeded accounts: four salespeople (one per region) and two
    /// central managers.
    #[must_use]
    pub fn builtin() -> Self {
        let catalog = store_catalog();
        let sales = [
            ("east_store1_sales_01", "STORE-EAST-01"),
            ("west_store1_sales_01", "STORE-WEST-01"),
            ("north_store1_sales_01", "STORE-NORTH-01"),
            ("south_store1_sales_01", "STORE-SOUTH-01"),
        ]
        .into_iter()
        .map(|(account, store)| Credential::sales(account, SEEDED_PASSWORD, StoreId::from(store)))
        .collect();
        let managers = ["central001", "central002"]
            .into_iter()
            .map(|account| Credential::central_manager(account, SEEDED_PASSWORD, &catalog))
            .collect();

        Self { sales, managers }
    }

    /// Build a table from arbitrary credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if an account is duplicated, a salesperson is not
    /// bound to exactly one catalog store, or either role has no account.
    pub fn new(credentials: Vec<Credential>) -> Result<Self, CredentialTableError> {
        let catalog = store_catalog();
        let mut seen = HashSet::new();
        let mut sales = Vec::new();
        let mut managers = Vec::new();

        for credential in credentials {
            if !seen.insert(credential.account().to_owned()) {
                return Err(CredentialTableError::DuplicateAccount(
                    credential.account().to_owned(),
                ));
            }
            match credential.role() {
                Role::Sales => {
                    validate_sales_stores(credential.account(), credential.stores(), &catalog)?;
                    sales.push(credential);
                }
                Role::CentralManager => managers.push(credential),
            }
        }

        if sales.is_empty() {
            return Err(CredentialTableError::NoCredentials(Role::Sales));
        }
        if managers.is_empty() {
            return Err(CredentialTableError::NoCredentials(Role::CentralManager));
        }

        Ok(Self { sales, managers })
    }

    /// Parse a YAML credentials file.
    ///
    /// Salesperson entries list their single store under `stores`; manager
    /// entries always receive the full catalog and any `stores` they list
    /// are ignored.
    ///
    /// ```yaml
    /// - account: east_store1_sales_01
    ///   password: "123456"
    ///   role: sales
    ///   stores: [STORE-EAST-01]
    /// - account: central001
    ///   password: "123456"
    ///   role: centralManager
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not parse or the resulting table
    /// fails validation (see [`CredentialTable::new`]).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CredentialTableError> {
        let entries: Vec<CredentialEntry> = serde_yaml::from_str(yaml)?;
        let catalog = store_catalog();
        let mut credentials = Vec::with_capacity(entries.len());

        for entry in entries {
            let credential = match entry.role {
                Role::Sales => {
                    let stores: Vec<StoreId> =
                        entry.stores.into_iter().map(StoreId::from).collect();
                    validate_sales_stores(&entry.account, &stores, &catalog)?;
                    let Some(store) = stores.into_iter().next() else {
                        return Err(CredentialTableError::SalesStoreCount {
                            account: entry.account,
                            count: 0,
                        });
                    };
                    Credential::sales(entry.account, entry.password, store)
                }
                Role::CentralManager => {
                    Credential::central_manager(entry.account, entry.password, &catalog)
                }
            };
            credentials.push(credential);
        }

        Self::new(credentials)
    }

    /// Accounts for one role.
    #[must_use]
    pub fn for_role(&self, role: Role) -> &[Credential] {
        match role {
            Role::Sales => &self.sales,
            Role::CentralManager => &self.managers,
        }
    }

    /// All accounts, salespeople first.
    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.sales.iter().chain(self.managers.iter())
    }

    /// Pick an account for `role` uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialTableError::NoCredentials`] if the role has no
    /// account.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        role: Role,
        rng: &mut R,
    ) -> Result<&Credential, CredentialTableError> {
        self.for_role(role)
            .choose(rng)
            .ok_or(CredentialTableError::NoCredentials(role))
    }
}

impl Default for CredentialTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate_sales_stores(
    account: &str,
    stores: &[StoreId],
    catalog: &[StoreId],
) -> Result<(), CredentialTableError> {
    if stores.len() != 1 {
        return Err(CredentialTableError::SalesStoreCount {
            account: account.to_owned(),
            count: stores.len(),
        });
    }
    if let Some(unknown) = stores.iter().find(|store| !catalog.contains(store)) {
        return Err(CredentialTableError::UnknownStore {
            account: account.to_owned(),
            store: unknown.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(store_catalog().len(), 8);
        assert_eq!(product_catalog().len(), 6);
    }

    #[test]
    fn test_builtin_table_shape() {
        let table = CredentialTable::builtin();
        assert_eq!(table.for_role(Role::Sales).len(), 4);
        assert_eq!(table.for_role(Role::CentralManager).len(), 2);

        for cred in table.for_role(Role::Sales) {
            assert_eq!(cred.stores().len(), 1);
        }
        for cred in table.for_role(Role::CentralManager) {
            assert_eq!(cred.stores(), store_catalog().as_slice());
        }
    }

    #[test]
    fn test_builtin_sales_bindings() {
        let table = CredentialTable::builtin();
        let bindings: Vec<(&str, &str)> = table
            .for_role(Role::Sales)
            .iter()
            .map(|c| (c.account(), c.stores().first().unwrap().as_str()))
            .collect();
        assert_eq!(
            bindings,
            vec![
                ("east_store1_sales_01", "STORE-EAST-01"),
                ("west_store1_sales_01", "STORE-WEST-01"),
                ("north_store1_sales_01", "STORE-NORTH-01"),
                ("south_store1_sales_01", "STORE-SOUTH-01"),
            ]
        );
    }

    #[test]
    fn test_pick_returns_account_of_role() {
        let table = CredentialTable::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(
                table.pick(Role::CentralManager, &mut rng).unwrap().role(),
                Role::CentralManager
            );
            assert_eq!(table.pick(Role::Sales, &mut rng).unwrap().role(), Role::Sales);
        }
    }

    #[test]
    fn test_new_rejects_missing_role() {
        let only_sales = vec![Credential::sales("s", "p", StoreId::new("STORE-EAST-01"))];
        assert!(matches!(
            CredentialTable::new(only_sales),
            Err(CredentialTableError::NoCredentials(Role::CentralManager))
        ));
    }

    #[test]
    fn test_new_rejects_duplicate_account() {
        let catalog = store_catalog();
        let creds = vec![
            Credential::sales("dup", "p", StoreId::new("STORE-EAST-01")),
            Credential::central_manager("dup", "p", &catalog),
        ];
        assert!(matches!(
            CredentialTable::new(creds),
            Err(CredentialTableError::DuplicateAccount(account)) if account == "dup"
        ));
    }

    #[test]
    fn test_new_rejects_unknown_store() {
        let catalog = store_catalog();
        let creds = vec![
            Credential::sales("s", "p", StoreId::new("STORE-MOON-01")),
            Credential::central_manager("m", "p", &catalog),
        ];
        assert!(matches!(
            CredentialTable::new(creds),
            Err(CredentialTableError::UnknownStore { .. })
        ));
    }

    #[test]
    fn test_yaml_round_trip_of_seeded_accounts() {
        let yaml = r#"
- account: east_store1_sales_01
  password: "123456"
  role: sales
  stores: [STORE-EAST-01]
- account: central001
  password: "123456"
  role: centralManager
  stores: [STORE-EAST-01]
"#;
        let table = CredentialTable::from_yaml_str(yaml).unwrap();
        assert_eq!(table.for_role(Role::Sales).len(), 1);
        let manager = table.for_role(Role::CentralManager).first().unwrap();
        assert_eq!(manager.stores(), store_catalog().as_slice());
    }

    #[test]
    fn test_yaml_rejects_sales_without_store() {
        let yaml = r#"
- account: s
  password: "1"
  role: sales
- account: m
  password: "1"
  role: centralManager
"#;
        assert!(matches!(
            CredentialTable::from_yaml_str(yaml),
            Err(CredentialTableError::SalesStoreCount { count: 0, .. })
        ));
    }

    #[test]
    fn test_yaml_rejects_sales_with_two_stores() {
        let yaml = r#"
- account: s
  password: "1"
  role: sales
  stores: [STORE-EAST-01, STORE-EAST-02]
- account: m
  password: "1"
  role: centralManager
"#;
        assert!(matches!(
            CredentialTable::from_yaml_str(yaml),
            Err(CredentialTableError::SalesStoreCount { count: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_rejects_unknown_role() {
        let yaml = r#"
- account: w
  password: "1"
  role: warehouse
"#;
        assert!(matches!(
            CredentialTable::from_yaml_str(yaml),
            Err(CredentialTableError::Yaml(_))
        ));
    }
}
