use raksha_backend_client::AlertSubscription;
use raksha_core::session::Action;
use raksha_core::session::SubscriptionId;

/// Messages posted to the UI thread by background tasks.
#[derive(Debug)]
pub(crate) enum AppEvent {
    /// Feed a session action through the reducer.
    Session(Action),

    /// A live-feed connection finished opening. The UI keeps the handle only
    /// if `id` is still the current subscription.
    LiveFeedReady {
        id: SubscriptionId,
        subscription: AlertSubscription,
    },

    ExitRequest,
}
