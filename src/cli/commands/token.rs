//! Token command: inspect or forget the remembered GitHub token.

use crate::cli::{RuntimeConfig, TokenAction};
use crate::error::Result;
use crate::token::{TokenStore, mask};

/// Execute token command
pub(super) async fn execute_token(action: TokenAction, config: &RuntimeConfig) -> Result<i32> {
    let store = TokenStore::default_location()?;

    match action {
        TokenAction::Show => match store.load()? {
            Some(token) => {
                config.println(&mask(&token));
                config.verbose_println(&format!("Stored in {}", store.path().display()));
            }
            None => config.println("No token remembered"),
        },
        TokenAction::Clear => {
            store.clear()?;
            config.success_println("Remembered token cleared");
        }
    }
    Ok(0)
}
