use super::report::{event_line, terminal_line, EXIT_OK, EXIT_USAGE};
use super::*;
use albumdl_core::error::{
    DownloadError, FetchError, NetworkError, ResolutionError, TransportKind,
};
use albumdl_core::model::{AlbumId, Track, TrackId};
use albumdl_core::pipeline::{RunEvent, SavedTrack, Terminal};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_album_id() {
    let cli = parse(&["albumdl", "3475911"]);
    assert_eq!(cli.album_id, "3475911");
    assert!(cli.output_dir.is_none());
    assert!(cli.config.is_none());
}

#[test]
fn cli_parse_keeps_invalid_id_for_validation() {
    // Rejection happens in the pipeline so it reports a ValidationError, not a clap error.
    assert_eq!(parse(&["albumdl", "abc"]).album_id, "abc");
    assert_eq!(parse(&["albumdl", "-5"]).album_id, "-5");
}

#[test]
fn cli_parse_output_dir_and_config() {
    let cli = parse(&[
        "albumdl",
        "42",
        "--output-dir",
        "/tmp/music",
        "--config",
        "/etc/albumdl.toml",
    ]);
    assert_eq!(cli.output_dir.as_deref(), Some(Path::new("/tmp/music")));
    assert_eq!(cli.config.as_deref(), Some(Path::new("/etc/albumdl.toml")));

    let short = parse(&["albumdl", "-o", "out", "42"]);
    assert_eq!(short.output_dir.as_deref(), Some(Path::new("out")));
    assert_eq!(short.album_id, "42");
}

#[test]
fn cli_parse_requires_album_id() {
    assert!(Cli::try_parse_from(["albumdl"]).is_err());
    assert!(Cli::try_parse_from(["albumdl", "1", "2"]).is_err());
}

fn track() -> Track {
    Track {
        id: TrackId(7),
        title: "Intro".into(),
        album_title: "Night".into(),
        index: Some(1),
    }
}

#[test]
fn event_lines_match_console_format() {
    let album_id = AlbumId::new(12).unwrap();
    assert_eq!(event_line(&RunEvent::Started { album_id }), "album id: 12");
    assert_eq!(
        event_line(&RunEvent::TracksListed { total: 3 }),
        "all track list got, total: 3"
    );

    let t = track();
    let saved = SavedTrack {
        path: PathBuf::from("/music/Night/Intro.m4a"),
        bytes: 10,
        sha256: String::new(),
    };
    assert_eq!(
        event_line(&RunEvent::Downloaded {
            index: 0,
            track: &t,
            saved: &saved
        }),
        "downloaded! file: /music/Night/Intro.m4a"
    );

    let err = DownloadError::Network(NetworkError::Transport {
        kind: TransportKind::Timeout,
        message: "operation timed out".into(),
    });
    assert_eq!(
        event_line(&RunEvent::DownloadFailed {
            index: 0,
            track: &t,
            error: &err
        }),
        "error in audio download, err: network error: timed out: operation timed out"
    );

    let err = ResolutionError::UnknownTrack(TrackId(7));
    assert_eq!(
        event_line(&RunEvent::ResolutionFailed {
            index: 0,
            track: &t,
            error: &err
        }),
        "error in get audio address, err: track 7 unknown to the catalog"
    );
}

#[test]
fn exit_codes_by_terminal() {
    let invalid = AlbumId::parse("abc").unwrap_err();
    assert_eq!(exit_code(&Terminal::Fatal(invalid.into())), EXIT_USAGE);

    let missing = FetchError::NotFound(AlbumId::new(1).unwrap());
    assert_eq!(exit_code(&Terminal::Fatal(missing.into())), EXIT_FAILURE);

    assert_eq!(exit_code(&Terminal::EmptyAlbum), EXIT_OK);
    assert_eq!(
        exit_code(&Terminal::Completed {
            successes: 0,
            failures: 3
        }),
        EXIT_OK
    );
    assert_eq!(
        exit_code(&Terminal::Aborted {
            successes: 1,
            failures: 0,
            error: ResolutionError::Unavailable(TrackId(2)),
        }),
        EXIT_OK
    );
}

#[test]
fn terminal_lines() {
    let (line, stderr) = terminal_line(&Terminal::Completed {
        successes: 2,
        failures: 1,
    });
    assert_eq!(line, "done: 2 downloaded, 1 failed");
    assert!(!stderr);

    let missing = FetchError::NotFound(AlbumId::new(9).unwrap());
    let (line, stderr) = terminal_line(&Terminal::Fatal(missing.into()));
    assert_eq!(line, "error: album 9 not found");
    assert!(stderr);
}
