//! The credential fields a configuration can hold.

use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// Where API credentials are issued.
pub const API_CREDENTIALS_URL: &str = "https://my.telegram.org/auth?to=apps";

/// A single credential item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Telegram API ID of the application.
    ApiId,
    /// Telegram API hash of the application.
    ApiHash,
    /// Bot token issued by `@BotFather`.
    BotToken,
    /// Phone number of a user account.
    PhoneNumber,
}

impl Field {
    /// All fields, in the order they are prompted for.
    pub const ALL: [Self; 4] = [Self::ApiId, Self::ApiHash, Self::BotToken, Self::PhoneNumber];

    /// Key used in the JSON file.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ApiId => "api_id",
            Self::ApiHash => "api_hash",
            Self::BotToken => "bot_token",
            Self::PhoneNumber => "phone_number",
        }
    }

    /// Text shown when asking the user for this field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ApiId => "Enter the Telegram API ID of your application",
            Self::ApiHash => "Enter the Telegram API Hash of your application",
            Self::BotToken => "Enter your bot token obtained from BotFather",
            Self::PhoneNumber => "Enter your phone number",
        }
    }

    /// Tip printed before the prompt, if any.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ApiId | Self::ApiHash => Some(
                "Tip: To obtain your API ID and API Hash, log in to your Telegram account at: https://my.telegram.org/auth?to=apps",
            ),
            Self::BotToken | Self::PhoneNumber => None,
        }
    }

    /// Whether the value should be masked when displayed.
    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::ApiHash | Self::BotToken)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| ConfigError::UnknownField(s.to_owned()))
    }
}
