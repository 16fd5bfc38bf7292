//! Channel routing
//!
//! Maps a notification's importance and context onto the channels a user
//! allows. Pure: same inputs, same output, nothing touched.

use super::channel::Channel;
use super::importance::Importance;
use crate::preference::UserPreference;
use tracing::debug;

/// Context tag that unlocks email and SMS for low-importance notifications.
pub const OPT_IN_CONTEXT: &str = "opt-in";

/// Candidate channels per importance, in delivery order, before preference filtering.
fn candidates(importance: Importance, context: Option<&str>) -> &'static [Channel] {
    match importance {
        Importance::High => &[Channel::Sms, Channel::Email, Channel::InApp],
        Importance::Normal => &[Channel::Email, Channel::InApp],
        Importance::Low if context == Some(OPT_IN_CONTEXT) => {
            &[Channel::InApp, Channel::Email, Channel::Sms]
        }
        Importance::Low => &[Channel::InApp],
    }
}

/// Resolve the ordered channel list for one notification.
///
/// The result is always a subset of `preferences.preferred_channels`; an empty
/// preference set yields an empty list.
pub fn route(
    importance: Importance,
    context: Option<&str>,
    preferences: &UserPreference,
) -> Vec<Channel> {
    let channels: Vec<Channel> = candidates(importance, context)
        .iter()
        .copied()
        .filter(|c| preferences.allows(*c))
        .collect();

    debug!(
        user_id = %preferences.user_id,
        importance = %importance,
        context = ?context,
        channels = ?channels,
        "Resolved notification channels"
    );

    channels
}
