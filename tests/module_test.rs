use serde_json::{Value, json};
use soundcloud_module::ModuleError;
use soundcloud_module::config::ModuleSettings;
use soundcloud_module::mapping::{ERR_ALREADY_DOWNLOADED, ERR_NOT_STREAMABLE};
use soundcloud_module::module::{
    MODULE_INFORMATION, MobileModule, ModuleInterface, WebModule, build_module,
};
use soundcloud_module::soundcloud::ApiBackend;
use soundcloud_module::types::{Codec, DownloadDescriptor, DownloadType, EntityKind, MediaType};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> ModuleSettings {
    ModuleSettings::new("token").with_api_base(server.uri())
}

fn mobile_track(id: u64, preset: &str) -> Value {
    json!({
        "urn": format!("soundcloud:tracks:{}", id),
        "title": format!("Track {}", id),
        "media": {"transcodings": [{
            "url": format!("https://cdn/{}.stream", id),
            "preset": preset,
            "format": {"protocol": "progressive", "mime_type": "audio/mpeg"}
        }]},
        "_embedded": {"user": {"urn": "soundcloud:users:9", "username": "Uploader", "permalink": "uploader"}}
    })
}

async fn mount_json(server: &MockServer, route: &str, body: Value, calls: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_url_parse_caches_resolved_document() {
    let server = MockServer::start().await;
    mount_json(&server, "/resolve", json!({"track": mobile_track(1, "mp3_0_0")}), 1).await;
    mount_json(&server, "/tracks/soundcloud:tracks:1", json!({}), 0).await;

    let mut module = MobileModule::new(&settings(&server));
    let found = module
        .custom_url_parse("https://soundcloud.com/uploader/track-1")
        .await
        .unwrap();

    assert_eq!(found.media_type, MediaType::Track);
    assert_eq!(found.media_id, "1");
    assert!(module.state().cache().contains(EntityKind::Track, "1"));

    let info = module.get_track_info("1").await.unwrap();
    assert_eq!(info.name, "Track 1");
}

#[tokio::test]
async fn test_unresolvable_url_is_invalid() {
    let server = MockServer::start().await;
    mount_json(&server, "/resolve", json!({"kind": "system-playlist", "id": 1}), 1).await;

    let mut module = WebModule::new(&settings(&server));
    let err = module
        .custom_url_parse("https://soundcloud.com/discover")
        .await
        .unwrap_err();

    assert!(matches!(err, ModuleError::InvalidInput(_)));
    assert_eq!(err.to_string(), "URL is invalid");
}

#[tokio::test]
async fn test_track_info_fetches_on_cache_miss_once() {
    let server = MockServer::start().await;
    mount_json(&server, "/tracks/soundcloud:tracks:2", mobile_track(2, "mp3_0_0"), 1).await;

    let mut module = MobileModule::new(&settings(&server));

    let first = module.get_track_info("2").await.unwrap();
    assert_eq!(first.error, None);
    assert_eq!(first.file_url.as_deref(), Some("https://cdn/2.stream"));

    // Served from the cache, and flagged as a repeat
    let second = module.get_track_info("2").await.unwrap();
    assert_eq!(second.error.as_deref(), Some(ERR_ALREADY_DOWNLOADED));
}

#[tokio::test]
async fn test_repeat_tracks_allowed_when_dedup_disabled() {
    let server = MockServer::start().await;
    mount_json(&server, "/tracks/soundcloud:tracks:2", mobile_track(2, "mp3_0_0"), 1).await;

    let mut module = MobileModule::new(&settings(&server).with_dedup(false));
    module.get_track_info("2").await.unwrap();

    let second = module.get_track_info("2").await.unwrap();
    assert_eq!(second.error, None);
    assert!(module.state().history().get_seen().is_empty());
}

#[tokio::test]
async fn test_failed_fetch_on_cache_miss_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tracks/soundcloud:tracks:3"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let mut module = MobileModule::new(&settings(&server));
    let err = module.get_track_info("3").await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
}

#[tokio::test]
async fn test_track_download_returns_url_with_auth_header() {
    let server = MockServer::start().await;
    mount_json(&server, "/tracks/soundcloud:tracks:4", mobile_track(4, "mp3_0_0"), 1).await;

    let mut module = MobileModule::new(&settings(&server));

    let err = module.get_track_download("4").await.unwrap_err();
    assert!(matches!(err, ModuleError::InvalidInput(_)));

    module.get_track_info("4").await.unwrap();
    match module.get_track_download("4").await.unwrap() {
        DownloadDescriptor::Url { url, headers } => {
            assert_eq!(url, "https://cdn/4.stream");
            assert_eq!(headers.get("authorization").map(String::as_str), Some("OAuth token"));
        }
        other => panic!("unexpected descriptor: {:?}", other),
    }
}

#[tokio::test]
async fn test_unstreamable_track_has_no_download() {
    let server = MockServer::start().await;
    let mut doc = mobile_track(5, "mp3_0_0");
    doc["media"]["transcodings"][0]["format"]["protocol"] = json!("hls");
    mount_json(&server, "/tracks/soundcloud:tracks:5", doc, 1).await;

    let mut module = MobileModule::new(&settings(&server));
    let info = module.get_track_info("5").await.unwrap();

    assert_eq!(info.error.as_deref(), Some(ERR_NOT_STREAMABLE));
    assert!(module.get_track_download("5").await.is_err());
}

#[tokio::test]
async fn test_search_caches_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/tracks"))
        .and(query_param("q", "darkside"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": [mobile_track(6, "mp3_0_0"), mobile_track(7, "opus_0_0")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_json(&server, "/tracks/soundcloud:tracks:7", json!({}), 0).await;

    let mut module = MobileModule::new(&settings(&server));
    let results = module.search(MediaType::Track, "darkside", 10).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].result_id, "6");
    assert_eq!(results[0].artists, Some(vec!["Uploader".to_string()]));

    let info = module.get_track_info("7").await.unwrap();
    assert_eq!(info.codec, Some(Codec::Opus));
}

#[tokio::test]
async fn test_album_info_caches_its_tracks() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/playlists/soundcloud:playlists:20/info",
        json!({
            "playlist": {
                "urn": "soundcloud:playlists:20",
                "title": "Different World",
                "is_album": true,
                "release_date": "2018-12-14",
                "_embedded": {"user": {"username": "Uploader", "permalink": "uploader"}}
            },
            "tracks": {"collection": [mobile_track(21, "mp3_0_0"), mobile_track(22, "aac_160k")]}
        }),
        1,
    )
    .await;
    mount_json(&server, "/tracks/soundcloud:tracks:22", json!({}), 0).await;

    let mut module = MobileModule::new(&settings(&server));
    let album = module.get_album_info("20").await.unwrap();

    assert_eq!(album.name, "Different World");
    assert_eq!(album.artist, "Uploader");
    assert_eq!(album.release_year, Some(2018));
    assert_eq!(album.tracks, vec!["21", "22"]);

    let info = module.get_track_info("22").await.unwrap();
    assert_eq!(info.codec, Some(Codec::Aac));
}

#[tokio::test]
async fn test_artist_info_lists_albums_and_tracks() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/users/soundcloud:users:9/albums/posted",
        json!({"collection": [{"target_urn": "soundcloud:playlists:20"}]}),
        1,
    )
    .await;
    mount_json(
        &server,
        "/users/soundcloud:users:9/tracks/posted",
        json!({"collection": [
            {"target_urn": "soundcloud:tracks:21", "track": mobile_track(21, "mp3_0_0")}
        ]}),
        1,
    )
    .await;
    mount_json(
        &server,
        "/users/soundcloud:users:9",
        json!({"urn": "soundcloud:users:9", "username": "Uploader"}),
        1,
    )
    .await;

    let mut module = MobileModule::new(&settings(&server));
    let artist = module.get_artist_info("9").await.unwrap();

    assert_eq!(artist.name, "Uploader");
    assert_eq!(artist.albums, vec!["20"]);
    assert_eq!(artist.tracks, vec!["21"]);
    assert!(module.state().cache().contains(EntityKind::Track, "21"));
}

fn web_track(server: &MockServer, id: u64) -> Value {
    json!({
        "id": id,
        "title": format!("Web {}", id),
        "streamable": true,
        "downloadable": false,
        "user": {"id": 9, "username": "Uploader", "permalink": "uploader"},
        "media": {"transcodings": [{
            "url": format!("{}/media/{}/progressive", server.uri(), id),
            "preset": "mp3_0_0",
            "format": {"protocol": "progressive", "mime_type": "audio/mpeg"}
        }]}
    })
}

#[tokio::test]
async fn test_web_track_resolves_transcoding_url() {
    let server = MockServer::start().await;
    mount_json(&server, "/tracks/30", web_track(&server, 30), 1).await;
    mount_json(&server, "/media/30/progressive", json!({"url": "https://cdn/30.mp3"}), 1).await;

    let mut module = WebModule::new(&settings(&server));
    let info = module.get_track_info("30").await.unwrap();

    assert_eq!(info.file_url.as_deref(), Some("https://cdn/30.mp3"));
    assert_eq!(info.codec, Some(Codec::Mp3));
}

#[tokio::test]
async fn test_web_track_prefers_downloadable_original() {
    let server = MockServer::start().await;
    let mut doc = web_track(&server, 31);
    doc["downloadable"] = json!(true);
    doc["has_downloads_left"] = json!(true);
    mount_json(&server, "/tracks/31", doc, 1).await;
    mount_json(
        &server,
        "/tracks/31/download",
        json!({"redirectUri": format!("{}/files/31", server.uri())}),
        1,
    )
    .await;
    mount_json(&server, "/media/31/progressive", json!({}), 0).await;

    Mock::given(method("HEAD"))
        .and(path("/files/31"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "audio/flac"))
        .mount(&server)
        .await;

    let mut module = WebModule::new(&settings(&server));
    let info = module.get_track_info("31").await.unwrap();

    assert_eq!(info.codec, Some(Codec::Flac));
    assert_eq!(info.file_url, Some(format!("{}/files/31", server.uri())));
}

#[tokio::test]
async fn test_web_playlist_info_lists_refilled_tracks() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/playlists/40",
        json!({
            "id": 40,
            "title": "Long set",
            "is_album": false,
            "user": {"id": 9, "username": "Uploader", "permalink": "uploader"},
            "tracks": [web_track(&server, 41), {"id": 42}]
        }),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/tracks"))
        .and(query_param("ids", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([web_track(&server, 42)])))
        .expect(1)
        .mount(&server)
        .await;

    let mut module = WebModule::new(&settings(&server));
    let playlist = module.get_playlist_info("40").await.unwrap();

    assert_eq!(playlist.name, "Long set");
    assert_eq!(playlist.creator, "Uploader");
    assert_eq!(playlist.tracks, vec!["41", "42"]);
    assert!(module.state().cache().contains(EntityKind::Track, "42"));
}

#[test]
fn test_build_module_requires_token() {
    let err = build_module(ModuleSettings::new("  ")).err().unwrap();
    assert!(matches!(err, ModuleError::Config(_)));

    let module = build_module(ModuleSettings::new("t").with_backend(ApiBackend::Web)).unwrap();
    assert_eq!(module.information().service_name, "SoundCloud");
}

#[test]
fn test_module_handles_soundcloud_urls() {
    assert!(MODULE_INFORMATION.handles_url("https://soundcloud.com/alanwalker/darkside"));
    assert!(MODULE_INFORMATION.handles_url("https://m.soundcloud.com/alanwalker"));
    assert!(!MODULE_INFORMATION.handles_url("https://example.com/soundcloud"));
    assert!(!MODULE_INFORMATION.handles_url("not a url"));
}

#[tokio::test]
async fn test_unreachable_original_falls_back_to_transcoding() {
    let server = MockServer::start().await;
    let mut doc = web_track(&server, 60);
    doc["downloadable"] = json!(true);
    mount_json(&server, "/tracks/60", doc, 1).await;
    mount_json(&server, "/media/60/progressive", json!({"url": "https://cdn/60.mp3"}), 1).await;

    Mock::given(method("GET"))
        .and(path("/tracks/60/download"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no download"))
        .expect(1)
        .mount(&server)
        .await;

    let mut module = WebModule::new(&settings(&server));
    let info = module.get_track_info("60").await.unwrap();

    assert_eq!(info.error, None);
    assert_eq!(info.file_url.as_deref(), Some("https://cdn/60.mp3"));
    assert_eq!(info.codec, Some(Codec::Mp3));
}

#[tokio::test]
async fn test_failed_stream_lookup_is_not_recorded_as_downloaded() {
    let server = MockServer::start().await;
    mount_json(&server, "/tracks/61", web_track(&server, 61), 1).await;

    Mock::given(method("GET"))
        .and(path("/media/61/progressive"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_json(&server, "/media/61/progressive", json!({"url": "https://cdn/61.mp3"}), 1).await;

    let mut module = WebModule::new(&settings(&server));

    let err = module.get_track_info("61").await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert!(module.state().history().get_seen().is_empty());

    let retry = module.get_track_info("61").await.unwrap();
    assert_eq!(retry.error, None);
    assert_eq!(retry.file_url.as_deref(), Some("https://cdn/61.mp3"));
    assert_eq!(module.state().history().get_seen(), &vec!["61"]);
}

#[tokio::test]
async fn test_aac_download_goes_through_temp_file() {
    let server = MockServer::start().await;
    let mut doc = mobile_track(70, "aac_160k");
    doc["media"]["transcodings"][0]["url"] = json!(format!("{}/media/70.aac", server.uri()));
    mount_json(&server, "/tracks/soundcloud:tracks:70", doc, 1).await;

    Mock::given(method("GET"))
        .and(path("/media/70.aac"))
        .and(header("authorization", "OAuth token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"aac bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(&server).with_ffmpeg("no-such-ffmpeg-binary");
    let mut module = MobileModule::new(&settings);

    let info = module.get_track_info("70").await.unwrap();
    assert_eq!(info.download_type, DownloadType::TempFile);

    // Remuxing fails without ffmpeg, so the raw download is handed out
    match module.get_track_download("70").await.unwrap() {
        DownloadDescriptor::TempFile(file) => {
            assert_eq!(file.extension().and_then(|e| e.to_str()), Some("m4a"));
            assert_eq!(async_fs::read(&file).await.unwrap(), b"aac bytes");
            async_fs::remove_file(&file).await.unwrap();
        }
        other => panic!("unexpected descriptor: {:?}", other),
    }
}
