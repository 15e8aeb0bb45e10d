use crate::args::{ThemeAction, ThemeArgs};
use crate::commands::{open_ledger, Out};
use crate::{Config, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub dark_mode: bool,
}

/// Shows the dark mode setting, or changes it when an action is given.
pub async fn theme(config: Config, args: ThemeArgs) -> Result<Out<Theme>> {
    let mut ledger = open_ledger(&config).await?;
    let dark_mode = match args.action() {
        None => ledger.dark_mode(),
        Some(ThemeAction::Dark) => {
            ledger.set_dark_mode(true).await?;
            true
        }
        Some(ThemeAction::Light) => {
            ledger.set_dark_mode(false).await?;
            false
        }
        Some(ThemeAction::Toggle) => ledger.toggle_dark_mode().await?,
    };
    let message = format!("Dark mode is {}", if dark_mode { "on" } else { "off" });
    Ok(Out::new(message, Theme { dark_mode }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_theme() {
        let env = TestEnv::new().await;
        let out = theme(env.config(), ThemeArgs::new(None)).await.unwrap();
        assert_eq!(out.message(), "Dark mode is off");

        let out = theme(env.config(), ThemeArgs::new(Some(ThemeAction::Toggle)))
            .await
            .unwrap();
        assert_eq!(out.structure(), Some(&Theme { dark_mode: true }));
        assert!(env.ledger().await.dark_mode());

        theme(env.config(), ThemeArgs::new(Some(ThemeAction::Dark)))
            .await
            .unwrap();
        assert!(env.ledger().await.dark_mode());

        let out = theme(env.config(), ThemeArgs::new(Some(ThemeAction::Light)))
            .await
            .unwrap();
        assert_eq!(out.message(), "Dark mode is off");
    }
}
