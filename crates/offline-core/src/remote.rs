//! Remote-only operations.
//!
//! Everything that needs a server is expressed as a [`RemoteRequest`] and
//! dispatched through [`RemoteCatalog::execute`]. An online implementation
//! answers them; the offline gate rejects them all.

use crate::error::CatalogResult;
use crate::model::Directory;

/// Jukebox remote control commands
#[derive(Debug, Clone, PartialEq)]
pub enum JukeboxCommand {
    UpdatePlaylist { ids: Vec<String> },
    Skip { index: u32, offset_seconds: u32 },
    Stop,
    Start,
    Status,
    SetGain { gain: f32 },
}

/// One request against the remote server
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteRequest {
    // Browsing by server-assigned id
    GetArtist { id: String },
    GetAlbum { id: String },
    GetArtistInfo { id: String },
    GetMusicFolders,
    StartRescan,
    GetStarredList,
    GetAlbumList { list_type: String, size: u32, offset: u32 },
    GetGenres,
    GetSongsByGenre { genre: String, count: u32, offset: u32 },
    GetTopTrackSongs { artist: String, size: u32 },

    // Streaming
    GetMusicUrl { id: String, max_bitrate: u32 },
    GetVideoStreamUrl { id: String, format: String, max_bitrate: u32 },
    GetHlsUrl { id: String, bit_rate: u32 },
    GetDownloadStream { id: String, offset: u64, max_bitrate: u32 },

    Jukebox(JukeboxCommand),

    // Server-side playlists
    CreatePlaylist { name: String, entry_ids: Vec<String> },
    DeletePlaylist { id: String },
    AddToPlaylist { id: String, entry_ids: Vec<String> },
    RemoveFromPlaylist { id: String, positions: Vec<u32> },
    UpdatePlaylist { id: String, name: String, comment: String, public: bool },

    GetLyrics { artist: String, title: String },

    // Sharing and chat
    GetShares,
    CreateShare { ids: Vec<String>, description: Option<String>, expires: Option<i64> },
    DeleteShare { id: String },
    UpdateShare { id: String, description: Option<String>, expires: Option<i64> },
    GetChatMessages { since: Option<i64> },
    AddChatMessage { message: String },

    // Podcast channel management
    RefreshPodcasts,
    CreatePodcastChannel { url: String },
    DeletePodcastChannel { id: String },
    DownloadPodcastEpisode { id: String },
    DeletePodcastEpisode { id: String },

    SetRating { id: String, rating: u8 },

    // Bookmarks
    GetBookmarks,
    CreateBookmark { id: String, position_ms: u64, comment: Option<String> },
    DeleteBookmark { id: String },

    // User administration
    GetUser { username: String },
    GetUsers,
    CreateUser { username: String },
    UpdateUser { username: String },
    DeleteUser { username: String },
    ChangeEmail { username: String, email: String },
    ChangePassword { username: String, password: String },

    // Images by URL
    GetCoverArtUrl { id: String },
    GetAvatar { username: String, size: u32 },
    GetBitmap { url: String, size: u32 },

    ProcessOfflineSyncs,
    SetInstance { instance: Option<u32> },
}

impl RemoteRequest {
    /// Stable operation name, used in errors and logs
    pub fn operation(&self) -> &'static str {
        match self {
            RemoteRequest::GetArtist { .. } => "get_artist",
            RemoteRequest::GetAlbum { .. } => "get_album",
            RemoteRequest::GetArtistInfo { .. } => "get_artist_info",
            RemoteRequest::GetMusicFolders => "get_music_folders",
            RemoteRequest::StartRescan => "start_rescan",
            RemoteRequest::GetStarredList => "get_starred_list",
            RemoteRequest::GetAlbumList { .. } => "get_album_list",
            RemoteRequest::GetGenres => "get_genres",
            RemoteRequest::GetSongsByGenre { .. } => "get_songs_by_genre",
            RemoteRequest::GetTopTrackSongs { .. } => "get_top_track_songs",
            RemoteRequest::GetMusicUrl { .. } => "get_music_url",
            RemoteRequest::GetVideoStreamUrl { .. } => "get_video_stream_url",
            RemoteRequest::GetHlsUrl { .. } => "get_hls_url",
            RemoteRequest::GetDownloadStream { .. } => "get_download_stream",
            RemoteRequest::Jukebox(command) => match command {
                JukeboxCommand::UpdatePlaylist { .. } => "update_jukebox_playlist",
                JukeboxCommand::Skip { .. } => "skip_jukebox",
                JukeboxCommand::Stop => "stop_jukebox",
                JukeboxCommand::Start => "start_jukebox",
                JukeboxCommand::Status => "get_jukebox_status",
                JukeboxCommand::SetGain { .. } => "set_jukebox_gain",
            },
            RemoteRequest::CreatePlaylist { .. } => "create_playlist",
            RemoteRequest::DeletePlaylist { .. } => "delete_playlist",
            RemoteRequest::AddToPlaylist { .. } => "add_to_playlist",
            RemoteRequest::RemoveFromPlaylist { .. } => "remove_from_playlist",
            RemoteRequest::UpdatePlaylist { .. } => "update_playlist",
            RemoteRequest::GetLyrics { .. } => "get_lyrics",
            RemoteRequest::GetShares => "get_shares",
            RemoteRequest::CreateShare { .. } => "create_share",
            RemoteRequest::DeleteShare { .. } => "delete_share",
            RemoteRequest::UpdateShare { .. } => "update_share",
            RemoteRequest::GetChatMessages { .. } => "get_chat_messages",
            RemoteRequest::AddChatMessage { .. } => "add_chat_message",
            RemoteRequest::RefreshPodcasts => "refresh_podcasts",
            RemoteRequest::CreatePodcastChannel { .. } => "create_podcast_channel",
            RemoteRequest::DeletePodcastChannel { .. } => "delete_podcast_channel",
            RemoteRequest::DownloadPodcastEpisode { .. } => "download_podcast_episode",
            RemoteRequest::DeletePodcastEpisode { .. } => "delete_podcast_episode",
            RemoteRequest::SetRating { .. } => "set_rating",
            RemoteRequest::GetBookmarks => "get_bookmarks",
            RemoteRequest::CreateBookmark { .. } => "create_bookmark",
            RemoteRequest::DeleteBookmark { .. } => "delete_bookmark",
            RemoteRequest::GetUser { .. } => "get_user",
            RemoteRequest::GetUsers => "get_users",
            RemoteRequest::CreateUser { .. } => "create_user",
            RemoteRequest::UpdateUser { .. } => "update_user",
            RemoteRequest::DeleteUser { .. } => "delete_user",
            RemoteRequest::ChangeEmail { .. } => "change_email",
            RemoteRequest::ChangePassword { .. } => "change_password",
            RemoteRequest::GetCoverArtUrl { .. } => "get_cover_art_url",
            RemoteRequest::GetAvatar { .. } => "get_avatar",
            RemoteRequest::GetBitmap { .. } => "get_bitmap",
            RemoteRequest::ProcessOfflineSyncs => "process_offline_syncs",
            RemoteRequest::SetInstance { .. } => "set_instance",
        }
    }
}

/// Answer to a [`RemoteRequest`]
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteResponse {
    Directory(Directory),
    Url(String),
    Bytes(Vec<u8>),
    Done,
}

/// Operations that need a server
pub trait RemoteCatalog: Send + Sync {
    fn execute(&self, request: RemoteRequest) -> CatalogResult<RemoteResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jukebox_operations_are_distinct() {
        let names = [
            RemoteRequest::Jukebox(JukeboxCommand::Start).operation(),
            RemoteRequest::Jukebox(JukeboxCommand::Stop).operation(),
            RemoteRequest::Jukebox(JukeboxCommand::Status).operation(),
            RemoteRequest::Jukebox(JukeboxCommand::SetGain { gain: 0.5 }).operation(),
        ];
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn test_operation_name() {
        let request = RemoteRequest::GetHlsUrl {
            id: "42".to_string(),
            bit_rate: 320,
        };
        assert_eq!(request.operation(), "get_hls_url");
    }
}
