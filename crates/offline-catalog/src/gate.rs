//! Remote-only operations while offline.

use log::debug;

use offline_core::{CatalogError, CatalogResult, RemoteCatalog, RemoteRequest, RemoteResponse};

/// Rejects every remote request with the offline indicator
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGate;

impl RemoteCatalog for OfflineGate {
    fn execute(&self, request: RemoteRequest) -> CatalogResult<RemoteResponse> {
        let operation = request.operation();
        debug!("Rejecting {} in offline mode", operation);
        Err(CatalogError::offline_unsupported(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offline_core::{JukeboxCommand, OFFLINE_UNSUPPORTED_MESSAGE};

    #[test]
    fn test_every_request_rejected_uniformly() {
        let requests = vec![
            RemoteRequest::GetArtist { id: "1".to_string() },
            RemoteRequest::GetMusicUrl {
                id: "1".to_string(),
                max_bitrate: 0,
            },
            RemoteRequest::Jukebox(JukeboxCommand::Start),
            RemoteRequest::GetShares,
            RemoteRequest::AddChatMessage {
                message: "hi".to_string(),
            },
            RemoteRequest::CreatePodcastChannel {
                url: "http://example.com/feed".to_string(),
            },
            RemoteRequest::GetBookmarks,
            RemoteRequest::GetUsers,
            RemoteRequest::SetRating {
                id: "1".to_string(),
                rating: 5,
            },
            RemoteRequest::GetCoverArtUrl { id: "1".to_string() },
            RemoteRequest::GetAvatar {
                username: "me".to_string(),
                size: 64,
            },
        ];

        for request in requests {
            let operation = request.operation();
            match OfflineGate.execute(request) {
                Err(CatalogError::OfflineUnsupported { operation: rejected }) => {
                    assert_eq!(rejected, operation);
                }
                other => panic!("expected offline rejection, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_message_is_fixed() {
        let err = OfflineGate.execute(RemoteRequest::GetGenres).unwrap_err();
        assert!(err.is_offline_unsupported());
        assert_eq!(err.to_string(), OFFLINE_UNSUPPORTED_MESSAGE);
    }
}
