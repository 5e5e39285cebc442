//! Orchestrator: drives the state machine against the three collaborators.

use super::state::{Event, RunState, Terminal};
use super::{AudioAddressResolver, SavedTrack, TrackDownloader, TrackListFetcher};
use crate::error::{DownloadError, ResolutionError};
use crate::model::{AlbumId, Track};

/// Progress notifications, in the order they happen.
#[derive(Debug)]
pub enum RunEvent<'a> {
    /// Album id accepted; about to fetch its track list.
    Started { album_id: AlbumId },
    TracksListed { total: usize },
    Downloaded {
        index: usize,
        track: &'a Track,
        saved: &'a SavedTrack,
    },
    DownloadFailed {
        index: usize,
        track: &'a Track,
        error: &'a DownloadError,
    },
    /// The run stops after this event.
    ResolutionFailed {
        index: usize,
        track: &'a Track,
        error: &'a ResolutionError,
    },
}

/// Result of one run.
#[derive(Debug)]
pub struct RunReport {
    /// `None` when the argument failed validation.
    pub album_id: Option<AlbumId>,
    /// Files written, in track order.
    pub saved: Vec<SavedTrack>,
    pub terminal: Terminal,
}

#[derive(Clone, Copy)]
enum Input<'a> {
    Raw(&'a str),
    Id(AlbumId),
}

/// Sequences list fetch, address resolution and download for one album.
///
/// Strictly sequential: one collaborator call at a time, one track at a time.
pub struct Orchestrator<F, R, D> {
    fetcher: F,
    resolver: R,
    downloader: D,
}

impl<F, R, D> Orchestrator<F, R, D>
where
    F: TrackListFetcher,
    R: AudioAddressResolver,
    D: TrackDownloader,
{
    pub fn new(fetcher: F, resolver: R, downloader: D) -> Self {
        Self {
            fetcher,
            resolver,
            downloader,
        }
    }

    /// Validate a raw album id argument, then run. Invalid input ends in
    /// `Terminal::Fatal` without calling any collaborator.
    pub fn run_raw<O>(&self, raw: &str, observer: O) -> RunReport
    where
        O: FnMut(RunEvent<'_>),
    {
        self.drive(Input::Raw(raw), observer)
    }

    pub fn run<O>(&self, album_id: AlbumId, observer: O) -> RunReport
    where
        O: FnMut(RunEvent<'_>),
    {
        self.drive(Input::Id(album_id), observer)
    }

    fn drive<O>(&self, input: Input<'_>, mut observer: O) -> RunReport
    where
        O: FnMut(RunEvent<'_>),
    {
        let mut album: Option<AlbumId> = None;
        let mut tracks: Vec<Track> = Vec::new();
        let mut saved: Vec<SavedTrack> = Vec::new();
        let mut state = RunState::Init;

        let terminal = loop {
            if let RunState::Terminal(t) = state {
                break t;
            }

            let event = match &state {
                RunState::Init => {
                    let parsed = match input {
                        Input::Raw(raw) => AlbumId::parse(raw),
                        Input::Id(id) => Ok(id),
                    };
                    match parsed {
                        Ok(id) => Event::Validated(id),
                        Err(e) => {
                            tracing::warn!("rejected album id: {}", e);
                            Event::Invalid(e)
                        }
                    }
                }

                RunState::FetchList { album_id } => {
                    let album_id = *album_id;
                    album = Some(album_id);
                    observer(RunEvent::Started { album_id });
                    match self.fetcher.fetch_tracks(album_id) {
                        Ok(list) => {
                            tracks = list;
                            observer(RunEvent::TracksListed {
                                total: tracks.len(),
                            });
                            Event::Listed {
                                count: tracks.len(),
                            }
                        }
                        Err(e) => {
                            tracing::error!(album_id = %album_id, "track list fetch failed: {}", e);
                            Event::FetchFailed(e)
                        }
                    }
                }

                RunState::ResolveAddress { index, .. } => {
                    let track = &tracks[*index];
                    match self.resolver.resolve(track.id) {
                        Ok(address) => Event::Resolved(address),
                        Err(error) => {
                            tracing::warn!(
                                track_id = %track.id,
                                index = *index,
                                "address resolution failed, stopping: {}",
                                error
                            );
                            observer(RunEvent::ResolutionFailed {
                                index: *index,
                                track,
                                error: &error,
                            });
                            Event::ResolutionFailed(error)
                        }
                    }
                }

                RunState::DownloadTrack { index, address, .. } => {
                    let track = &tracks[*index];
                    match self.downloader.download(address, track) {
                        Ok(file) => {
                            observer(RunEvent::Downloaded {
                                index: *index,
                                track,
                                saved: &file,
                            });
                            saved.push(file);
                            Event::Downloaded
                        }
                        Err(error) => {
                            tracing::warn!(
                                track_id = %track.id,
                                index = *index,
                                "download failed, continuing: {}",
                                error
                            );
                            observer(RunEvent::DownloadFailed {
                                index: *index,
                                track,
                                error: &error,
                            });
                            Event::DownloadFailed
                        }
                    }
                }

                RunState::Terminal(_) => continue,
            };

            state = state.on(event);
        };

        let tally = terminal.tally();
        tracing::info!(
            album_id = album.map(AlbumId::get),
            successes = tally.successes,
            failures = tally.failures,
            "run finished"
        );

        RunReport {
            album_id: album,
            saved,
            terminal,
        }
    }
}
