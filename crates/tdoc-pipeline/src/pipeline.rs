//! Pipeline wiring.
//!
//! All dependencies are constructed once at process start and passed in;
//! nothing in the pipeline reaches for ambient state.

use std::sync::Arc;

use tdoc_bus::{EventBus, SubscriberRegistry};
use tdoc_collab::{ChannelSearch, Mailer, TitleGenerator, VideoListing};
use tdoc_store::JobStore;

use crate::error_notifier::ErrorNotifier;
use crate::fetch_videos::FetchVideosStage;
use crate::generate_titles::GenerateTitlesStage;
use crate::resolve_channel::ResolveChannelStage;
use crate::send_email::SendEmailStage;

/// Shared store and bus handles every stage works through.
pub struct PipelineDeps {
    pub store: Arc<dyn JobStore>,
    pub bus: EventBus,
}

/// The external collaborators the stages call.
pub struct Collaborators {
    pub channels: Arc<dyn ChannelSearch>,
    pub videos: Arc<dyn VideoListing>,
    pub titles: Arc<dyn TitleGenerator>,
    pub mailer: Arc<dyn Mailer>,
}

/// Subscribe every stage handler and the error notifier on the registry.
pub fn attach(
    registry: &mut SubscriberRegistry,
    store: Arc<dyn JobStore>,
    bus: EventBus,
    collaborators: Collaborators,
) {
    let deps = Arc::new(PipelineDeps { store, bus });

    registry.subscribe(Arc::new(ResolveChannelStage::new(
        Arc::clone(&deps),
        collaborators.channels,
    )));
    registry.subscribe(Arc::new(FetchVideosStage::new(
        Arc::clone(&deps),
        collaborators.videos,
    )));
    registry.subscribe(Arc::new(GenerateTitlesStage::new(
        Arc::clone(&deps),
        collaborators.titles,
    )));
    registry.subscribe(Arc::new(SendEmailStage::new(
        Arc::clone(&deps),
        Arc::clone(&collaborators.mailer),
    )));
    registry.subscribe(Arc::new(ErrorNotifier::new(deps, collaborators.mailer)));
}
