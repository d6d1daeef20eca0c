//! # Artist Notifications
//!
//! Publishers stamp artist updates with their own clock; followers keep
//! the newest update per artist and advance their clock past it.
//!
//! ## Flows Tested
//!
//! 1. Followers only see their favourite artists
//! 2. Follower clocks move past every received update
//! 3. Two followers on one bus see the same updates

#[cfg(test)]
mod tests {
    use crate::fixtures::Agent;
    use ch_01_logical_clock::LogicalClock;
    use ch_03_participant::{InMemoryLedgerStore, ParticipantAgent, ParticipantApi, ParticipantConfig};
    use shared_bus::{ArtistPublisher, EventPublisher, InMemoryEventBus};
    use std::sync::Arc;
    use std::time::Duration;

    fn follower(id: &str, artists: &[&str]) -> Arc<Agent> {
        let config = ParticipantConfig {
            favorite_artists: artists.iter().map(|a| a.to_string()).collect(),
            ..ParticipantConfig::for_node(id)
        };
        Arc::new(ParticipantAgent::new(config, InMemoryLedgerStore::new()))
    }

    fn publisher(bus: &Arc<InMemoryEventBus>, id: &str, counter: u64) -> ArtistPublisher {
        let bus: Arc<dyn EventPublisher> = bus.clone();
        ArtistPublisher::new(bus, Arc::new(LogicalClock::starting_at(id, counter)))
    }

    async fn wait_until(agent: &Agent, artists: usize) {
        for _ in 0..200 {
            if agent.artist_updates().len() >= artists {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test]
    async fn test_follower_sees_only_favourites() {
        let bus = Arc::new(InMemoryEventBus::new());
        let fan = follower("CLIENT_2", &["HUNTRX"]);
        let feed = fan.follow_artists(bus.as_ref());
        let label = publisher(&bus, "LABEL", 0);

        label.publish_artist_message("Saja Boys", "tour dates").await;
        label.publish_artist_message("HUNTRX", "Golden is out").await;
        wait_until(&fan, 1).await;

        let updates = fan.artist_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].artist, "HUNTRX");
        assert_eq!(updates[0].message, "Golden is out");
        assert!(fan.latest_update("Saja Boys").is_none());

        feed.stop();
    }

    #[tokio::test]
    async fn test_follower_clock_moves_past_publisher() {
        let bus = Arc::new(InMemoryEventBus::new());
        let fan = follower("CLIENT_3", &["HUNTRX"]);
        let feed = fan.follow_artists(bus.as_ref());
        let label = publisher(&bus, "LABEL", 40);

        label.publish_artist_message("HUNTRX", "world tour").await;
        wait_until(&fan, 1).await;

        let update = fan.latest_update("HUNTRX").unwrap();
        assert_eq!(update.lamport_timestamp, 41);
        assert!(fan.clock().snapshot().counter > 41);

        feed.stop();
    }

    #[tokio::test]
    async fn test_newest_update_wins_per_artist() {
        let bus = Arc::new(InMemoryEventBus::new());
        let a = follower("A", &["HUNTRX", "Saja Boys"]);
        let b = follower("B", &["HUNTRX"]);
        let feeds = [a.follow_artists(bus.as_ref()), b.follow_artists(bus.as_ref())];
        let label = publisher(&bus, "LABEL", 0);

        assert_eq!(label.publish_artist_message("HUNTRX", "first").await, 2);
        label.publish_artist_message("HUNTRX", "second").await;
        label.publish_artist_message("Saja Boys", "debut").await;
        wait_until(&a, 2).await;
        for _ in 0..200 {
            if b.latest_update("HUNTRX").is_some_and(|u| u.message == "second") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(a.latest_update("HUNTRX").unwrap().message, "second");
        assert_eq!(b.latest_update("HUNTRX").unwrap().message, "second");
        assert_eq!(a.latest_update("Saja Boys").unwrap().message, "debut");
        assert!(b.latest_update("Saja Boys").is_none());

        for feed in feeds {
            feed.stop();
        }
    }
}
