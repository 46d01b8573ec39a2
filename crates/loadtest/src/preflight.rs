//! Account and store binding check run before a load test.
//!
//! Logs in every selected account once and runs inventory probes with the
//! resulting session, so broken credentials or store bindings show up before
//! they pollute a load test's failure rates.

use rand::seq::IndexedRandom;
use storeload_core::probe::InventorySnapshot;
use storeload_core::{Credential, CredentialTable, Role, SessionPlan, StoreId};
use tracing::{error, info, warn};

use crate::backend::{BackendClient, BackendError};

/// Which accounts to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RoleFilter {
    /// Salespeople only
    Sales,
    /// Central managers only
    CentralManager,
    /// Every account
    #[default]
    All,
}

impl RoleFilter {
    /// Whether accounts of `role` are selected.
    #[must_use]
    pub const fn includes(self, role: Role) -> bool {
        matches!(
            (self, role),
            (Self::All, _)
                | (Self::Sales, Role::Sales)
                | (Self::CentralManager, Role::CentralManager)
        )
    }
}

/// Preflight options.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreflightOptions {
    /// Accounts to check
    pub roles: RoleFilter,
    /// Probe one random store per manager instead of the whole catalog
    pub sample: bool,
}

/// Outcome of one inventory probe.
#[derive(Debug)]
pub struct StoreCheck {
    /// Store that was queried
    pub location: StoreId,
    /// Probe result
    pub outcome: Result<InventorySnapshot, BackendError>,
}

/// Outcome for one account.
#[derive(Debug)]
pub struct AccountCheck {
    /// Account name
    pub account: String,
    /// Account role
    pub role: Role,
    /// Login result; probes only run when this is `Ok`
    pub login: Result<(), BackendError>,
    /// Inventory probes run with the account's session
    pub stores: Vec<StoreCheck>,
}

impl AccountCheck {
    /// Number of failed inventory probes.
    #[must_use]
    pub fn probe_failures(&self) -> usize {
        self.stores.iter().filter(|s| s.outcome.is_err()).count()
    }
}

/// Preflight results for every checked account.
#[derive(Debug, Default)]
pub struct PreflightReport {
    /// One entry per checked account, in credential table order
    pub accounts: Vec<AccountCheck>,
}

impl PreflightReport {
    /// Accounts whose login failed.
    pub fn login_failures(&self) -> impl Iterator<Item = &AccountCheck> {
        self.accounts.iter().filter(|a| a.login.is_err())
    }

    /// Whether any login failed.
    #[must_use]
    pub fn has_login_failures(&self) -> bool {
        self.login_failures().next().is_some()
    }

    /// Total failed inventory probes across all accounts.
    #[must_use]
    pub fn probe_failures(&self) -> usize {
        self.accounts.iter().map(AccountCheck::probe_failures).sum()
    }

    /// Log one line per account and a summary line.
    pub fn log(&self) {
        for check in &self.accounts {
            match &check.login {
                Err(e) => error!(
                    account = %check.account,
                    role = %check.role,
                    error = %e,
                    "Login failed"
                ),
                Ok(()) if check.probe_failures() == 0 => info!(
                    account = %check.account,
                    role = %check.role,
                    stores = check.stores.len(),
                    "OK"
                ),
                Ok(()) => {
                    for store in &check.stores {
                        if let Err(e) = &store.outcome {
                            warn!(
                                account = %check.account,
                                role = %check.role,
                                location_id = %store.location,
                                category = e.as_probe().map(|f| f.category().as_str()),
                                error = %e,
                                "Inventory probe failed"
                            );
                        }
                    }
                }
            }
        }
        info!(
            accounts = self.accounts.len(),
            login_failures = self.login_failures().count(),
            probe_failures = self.probe_failures(),
            "Preflight complete"
        );
    }
}

/// Check every account in `table` selected by `options`.
pub async fn run(
    client: &BackendClient,
    table: &CredentialTable,
    options: PreflightOptions,
) -> PreflightReport {
    let mut report = PreflightReport::default();
    for credential in table.iter().filter(|c| options.roles.includes(c.role())) {
        report.accounts.push(check_account(client, credential, options).await);
    }
    report
}

async fn check_account(
    client: &BackendClient,
    credential: &Credential,
    options: PreflightOptions,
) -> AccountCheck {
    let mut check = AccountCheck {
        account: credential.account().to_owned(),
        role: credential.role(),
        login: Ok(()),
        stores: Vec::new(),
    };

    let token = match client.login(credential).await {
        Ok(token) => token,
        Err(e) => {
            check.login = Err(e);
            return check;
        }
    };
    let session = SessionPlan::for_credential(credential).authenticated(token);

    let locations: Vec<StoreId> = match credential.role() {
        Role::CentralManager if options.sample => {
            let mut rng = rand::rng();
            credential.stores().choose(&mut rng).cloned().into_iter().collect()
        }
        _ => credential.stores().to_vec(),
    };

    for location in locations {
        let outcome = match credential.role() {
            Role::Sales => client.sales_inventory(&session, &location).await,
            Role::CentralManager => client.manager_inventory(&session, &location).await,
        };
        check.stores.push(StoreCheck { location, outcome });
    }
    check
}
