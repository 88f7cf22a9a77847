/// Network adapters for registries, repository hosts and the advisory API
mod github_client;
mod http;
mod npm_client;
mod osv_client;
mod pypi_client;

pub use github_client::{GitHubClient, GITHUB_HOST};
pub use http::{build_http_client, validate_url_component};
pub use npm_client::{NpmRegistry, NPM_ECOSYSTEM};
pub use osv_client::OsvClient;
pub use pypi_client::{PyPiRegistry, PYPI_ECOSYSTEM};
