//! Single-round game session.
//!
//! A session is either empty or holds one active [`Round`]. Starting a new
//! game replaces the whole round at once under the write lock, so readers
//! see either the old answer with the old image or the new pair, never a mix.

use std::sync::Arc;

use parking_lot::RwLock;
use rand::seq::IndexedRandom;
use thiserror::Error;
use tracing::info;

use crate::models::PlaceName;
use crate::silhouettes::{ImageFetchError, SilhouetteSource, TerritorySource, TerritorySourceError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("game not initialized")]
    NotInitialized,

    #[error("could not start a new game: {0}")]
    Territories(#[source] TerritorySourceError),

    #[error("could not start a new game: {0}")]
    Silhouette(#[source] ImageFetchError),
}

impl SessionError {
    /// Whether this came from a failed `start_new_game`
    pub fn is_init_failure(&self) -> bool {
        matches!(self, Self::Territories(_) | Self::Silhouette(_))
    }
}

/// The answer of the current game and its silhouette
#[derive(Debug)]
pub struct Round {
    answer: PlaceName,
    image: Arc<[u8]>,
}

impl Round {
    pub fn new(answer: PlaceName, image: Vec<u8>) -> Self {
        Self {
            answer,
            image: image.into(),
        }
    }

    pub fn answer(&self) -> &PlaceName {
        &self.answer
    }

    /// PNG bytes
    pub fn image(&self) -> Arc<[u8]> {
        Arc::clone(&self.image)
    }
}

pub struct GameSession {
    territories: Arc<dyn TerritorySource>,
    silhouettes: Arc<dyn SilhouetteSource>,
    current: RwLock<Option<Arc<Round>>>,
}

impl GameSession {
    pub fn new(
        territories: Arc<dyn TerritorySource>,
        silhouettes: Arc<dyn SilhouetteSource>,
    ) -> Self {
        Self {
            territories,
            silhouettes,
            current: RwLock::new(None),
        }
    }

    /// Pick a random territory, fetch its silhouette and make it the active round.
    ///
    /// All fetching happens before the lock is taken. If either fetch fails
    /// the previous round (or the empty state) is left untouched.
    pub async fn start_new_game(&self) -> Result<Arc<Round>, SessionError> {
        let names = self
            .territories
            .list_territory_names()
            .await
            .map_err(SessionError::Territories)?;

        let answer = names
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(SessionError::Territories(TerritorySourceError::Empty))?;

        let image = self
            .silhouettes
            .fetch_silhouette(&answer)
            .await
            .map_err(SessionError::Silhouette)?;

        let round = Arc::new(Round::new(answer, image));
        *self.current.write() = Some(Arc::clone(&round));

        info!("Started new game with {} candidate territories", names.len());
        Ok(round)
    }

    /// The active round as one consistent unit.
    ///
    /// A request should take one snapshot and work from it, so a game started
    /// mid-request cannot change the answer under it.
    pub fn snapshot(&self) -> Result<Arc<Round>, SessionError> {
        self.current
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(SessionError::NotInitialized)
    }

    pub fn current_answer(&self) -> Result<PlaceName, SessionError> {
        self.snapshot().map(|round| round.answer().clone())
    }

    pub fn current_image(&self) -> Result<Arc<[u8]>, SessionError> {
        self.snapshot().map(|round| round.image())
    }

    pub fn is_active(&self) -> bool {
        self.current.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StaticTerritories;

    fn session(territories: Arc<StaticTerritories>) -> GameSession {
        GameSession::new(territories.clone(), territories)
    }

    #[test]
    fn test_reads_fail_before_first_game() {
        let session = session(Arc::new(StaticTerritories::new(&["brazil"])));

        assert!(!session.is_active());
        assert!(matches!(
            session.current_answer(),
            Err(SessionError::NotInitialized)
        ));
        assert!(matches!(
            session.current_image(),
            Err(SessionError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_start_populates_answer_and_image() {
        let territories = Arc::new(StaticTerritories::new(&["brazil", "united_states"]));
        let session = session(territories.clone());

        let round = session.start_new_game().await.unwrap();

        let answer = session.current_answer().unwrap();
        assert_eq!(&answer, round.answer());
        assert!(["BRAZIL", "UNITED STATES"].contains(&answer.as_str()));
        assert_eq!(&*session.current_image().unwrap(), answer.slug().as_bytes());
        assert_eq!(territories.fetches(), 1);
    }

    #[tokio::test]
    async fn test_failed_listing_keeps_previous_round() {
        let territories = Arc::new(StaticTerritories::new(&["brazil"]));
        let session = session(territories.clone());
        session.start_new_game().await.unwrap();

        territories.fail_listing(true);
        let err = session.start_new_game().await.unwrap_err();

        assert!(err.is_init_failure());
        assert!(matches!(err, SessionError::Territories(_)));
        assert_eq!(session.current_answer().unwrap().as_str(), "BRAZIL");
        assert_eq!(&*session.current_image().unwrap(), b"brazil");
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_session_empty() {
        let territories = Arc::new(StaticTerritories::new(&["brazil"]));
        territories.fail_fetching(true);
        let session = session(territories);

        let err = session.start_new_game().await.unwrap_err();

        assert!(matches!(err, SessionError::Silhouette(_)));
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_empty_territory_list() {
        let session = session(Arc::new(StaticTerritories::new(&[])));

        let err = session.start_new_game().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Territories(TerritorySourceError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_snapshot_survives_new_game() {
        let territories = Arc::new(StaticTerritories::new(&["brazil", "chile", "peru"]));
        let session = session(territories);
        session.start_new_game().await.unwrap();

        let snapshot = session.snapshot().unwrap();
        for _ in 0..10 {
            session.start_new_game().await.unwrap();
        }

        // The held round is unchanged and still internally consistent
        assert_eq!(&*snapshot.image(), snapshot.answer().slug().as_bytes());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_a_mixed_round() {
        let territories = Arc::new(StaticTerritories::new(&[
            "brazil",
            "chile",
            "peru",
            "united_states",
        ]));
        let session = Arc::new(session(territories));
        session.start_new_game().await.unwrap();

        let writer = {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                for _ in 0..200 {
                    session.start_new_game().await.unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let session = Arc::clone(&session);
                tokio::spawn(async move {
                    for _ in 0..500 {
                        let round = session.snapshot().unwrap();
                        assert_eq!(&*round.image(), round.answer().slug().as_bytes());
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
