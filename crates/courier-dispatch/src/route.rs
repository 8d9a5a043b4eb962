// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed set of supported (platform, provider) delivery routes.

use courier_core::{CourierError, Platform, Provider};
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Route {
    /// WhatsApp Cloud API on Meta's Graph API.
    #[strum(serialize = "whatsapp_meta")]
    WhatsAppMeta,
    #[strum(serialize = "whatsapp_360dialog")]
    WhatsAppDialog360,
    #[strum(serialize = "whatsapp_twilio")]
    WhatsAppTwilio,
    /// Messenger and Instagram Direct through the Graph API Send API.
    #[strum(serialize = "meta_messaging")]
    MetaMessaging,
    #[strum(serialize = "telegram")]
    Telegram,
    #[strum(serialize = "webchat")]
    Webchat,
}

impl Route {
    /// Pick the route for an integration. Unlisted pairs are `UnsupportedPlatform`.
    pub fn resolve(platform: Platform, provider: Provider) -> Result<Self, CourierError> {
        match (platform, provider) {
            (Platform::WhatsApp, Provider::Meta) => Ok(Self::WhatsAppMeta),
            (Platform::WhatsApp, Provider::Dialog360) => Ok(Self::WhatsAppDialog360),
            (Platform::WhatsApp, Provider::Twilio) => Ok(Self::WhatsAppTwilio),
            (Platform::Messenger | Platform::Instagram, Provider::Meta) => Ok(Self::MetaMessaging),
            (Platform::Telegram, _) => Ok(Self::Telegram),
            (Platform::Webchat, _) => Ok(Self::Webchat),
            _ => Err(CourierError::UnsupportedPlatform {
                platform,
                provider: Some(provider),
            }),
        }
    }
}
