//! Webhook configuration
//!
//! Settings are read once at startup from flags or their environment
//! variables, validated, and frozen into a [`Config`] that every request
//! borrows. Nothing in the reconciler reads flags or the environment.

use clap::Args;

use crate::hostname::HostnameTemplate;
use crate::ownership::OwnedHosts;
use crate::Error;

/// Default name of the controller that takes routes nothing else matched
pub const DEFAULT_ROUTER: &str = "internal-router";

/// Strings accepted as "true" for boolean settings (case-insensitive)
const TRUE_STRINGS: &[&str] = &["true", "yes", "1", "ok"];

/// Parse a boolean setting
///
/// Anything outside [`TRUE_STRINGS`] is false, so a typo disables rather than
/// enables a behaviour.
pub fn parse_truthy(value: &str) -> Result<bool, std::convert::Infallible> {
    let value = value.trim().to_ascii_lowercase();
    Ok(TRUE_STRINGS.contains(&value.as_str()))
}

/// Reconciliation settings as given on the command line
#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Controller used for routes that no controller selects
    #[arg(long, global = true, env = "DEFAULT_ROUTER", default_value = DEFAULT_ROUTER)]
    pub default_router: String,

    /// Comma-separated host suffixes this webhook owns; owned hosts are regenerated
    #[arg(long, global = true, env = "OWNED_HOSTS", default_value = "")]
    pub owned_hosts: String,

    /// Hostname template; supports <name>, <ns>, <router-name> and <router-domain>
    #[arg(long, global = true, env = "HOST_NAME_TMPL", default_value = HostnameTemplate::DEFAULT)]
    pub hostname_template: String,

    /// Also mutate routes in system namespaces; a bare flag means true, a value needs `=`
    #[arg(
        long,
        global = true,
        env = "MUTATE_SYSTEM_ROUTES",
        default_value = "false",
        value_parser = parse_truthy,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub mutate_system_routes: bool,
}

/// Immutable, validated reconciliation configuration
#[derive(Clone, Debug)]
pub struct Config {
    default_router: String,
    owned_hosts: OwnedHosts,
    hostname_template: HostnameTemplate,
    mutate_system_routes: bool,
}

impl Config {
    /// Validate settings and build a configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the default router is blank or the
    /// hostname template does not compile.
    pub fn new(
        default_router: impl Into<String>,
        owned_hosts: OwnedHosts,
        hostname_template: &str,
        mutate_system_routes: bool,
    ) -> Result<Self, Error> {
        let default_router = default_router.into().trim().to_string();
        if default_router.is_empty() {
            return Err(Error::config("DEFAULT_ROUTER", "default router name must not be empty"));
        }

        Ok(Self {
            default_router,
            owned_hosts,
            hostname_template: HostnameTemplate::compile(hostname_template)?,
            mutate_system_routes,
        })
    }

    /// Name of the fallback controller
    pub fn default_router(&self) -> &str {
        &self.default_router
    }

    /// Host suffixes owned by the webhook
    pub fn owned_hosts(&self) -> &OwnedHosts {
        &self.owned_hosts
    }

    /// Compiled hostname template
    pub fn hostname_template(&self) -> &HostnameTemplate {
        &self.hostname_template
    }

    /// Whether system routes are mutated too
    pub fn mutate_system_routes(&self) -> bool {
        self.mutate_system_routes
    }
}

impl TryFrom<&ConfigArgs> for Config {
    type Error = Error;

    fn try_from(args: &ConfigArgs) -> Result<Self, Self::Error> {
        Self::new(
            args.default_router.as_str(),
            OwnedHosts::parse(&args.owned_hosts),
            &args.hostname_template,
            args.mutate_system_routes,
        )
    }
}
