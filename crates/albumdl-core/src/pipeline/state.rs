//! Run state machine and continuation policy.
//!
//! `Init → FetchList → {Terminal(EmptyAlbum) | ResolveAddress}`, then per track
//! `ResolveAddress → DownloadTrack → ResolveAddress(next)` until the list is
//! exhausted. A resolution failure ends iteration (`Aborted`); a download
//! failure is counted and iteration continues. Transitions are pure so the
//! policy can be tested without any I/O.

use crate::error::{FatalError, FetchError, ResolutionError, ValidationError};
use crate::model::{AlbumId, AudioAddress};

/// Download outcomes counted so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub successes: usize,
    pub failures: usize,
}

/// How a run ended.
#[derive(Debug)]
pub enum Terminal {
    /// The album exists but lists no tracks.
    EmptyAlbum,
    /// Validation or track list retrieval failed; nothing was attempted.
    Fatal(FatalError),
    /// Address resolution failed; later tracks were never attempted.
    Aborted {
        successes: usize,
        failures: usize,
        error: ResolutionError,
    },
    /// Every listed track was attempted.
    Completed { successes: usize, failures: usize },
}

impl Terminal {
    pub fn tally(&self) -> Tally {
        match self {
            Terminal::EmptyAlbum | Terminal::Fatal(_) => Tally::default(),
            Terminal::Aborted {
                successes,
                failures,
                ..
            }
            | Terminal::Completed {
                successes,
                failures,
            } => Tally {
                successes: *successes,
                failures: *failures,
            },
        }
    }
}

#[derive(Debug)]
pub enum RunState {
    Init,
    FetchList {
        album_id: AlbumId,
    },
    ResolveAddress {
        index: usize,
        total: usize,
        tally: Tally,
    },
    DownloadTrack {
        index: usize,
        total: usize,
        address: AudioAddress,
        tally: Tally,
    },
    Terminal(Terminal),
}

/// Outcome of the work done in the current state.
#[derive(Debug)]
pub enum Event {
    Validated(AlbumId),
    Invalid(ValidationError),
    Listed { count: usize },
    FetchFailed(FetchError),
    Resolved(AudioAddress),
    ResolutionFailed(ResolutionError),
    Downloaded,
    DownloadFailed,
}

impl RunState {
    /// Apply `event` to the current state.
    ///
    /// An event that does not belong to the current state leaves it unchanged.
    pub fn on(self, event: Event) -> RunState {
        match (self, event) {
            (RunState::Init, Event::Validated(album_id)) => RunState::FetchList { album_id },
            (RunState::Init, Event::Invalid(e)) => RunState::Terminal(Terminal::Fatal(e.into())),

            (RunState::FetchList { .. }, Event::Listed { count: 0 }) => {
                RunState::Terminal(Terminal::EmptyAlbum)
            }
            (RunState::FetchList { .. }, Event::Listed { count }) => RunState::ResolveAddress {
                index: 0,
                total: count,
                tally: Tally::default(),
            },
            (RunState::FetchList { .. }, Event::FetchFailed(e)) => {
                RunState::Terminal(Terminal::Fatal(e.into()))
            }

            (RunState::ResolveAddress { index, total, tally }, Event::Resolved(address)) => {
                RunState::DownloadTrack {
                    index,
                    total,
                    address,
                    tally,
                }
            }
            (RunState::ResolveAddress { tally, .. }, Event::ResolutionFailed(error)) => {
                RunState::Terminal(Terminal::Aborted {
                    successes: tally.successes,
                    failures: tally.failures,
                    error,
                })
            }

            (
                RunState::DownloadTrack {
                    index,
                    total,
                    mut tally,
                    ..
                },
                Event::Downloaded,
            ) => {
                tally.successes += 1;
                advance(index + 1, total, tally)
            }
            (
                RunState::DownloadTrack {
                    index,
                    total,
                    mut tally,
                    ..
                },
                Event::DownloadFailed,
            ) => {
                tally.failures += 1;
                advance(index + 1, total, tally)
            }

            (state, event) => {
                tracing::error!(?state, ?event, "event does not apply to state; ignored");
                state
            }
        }
    }
}

fn advance(next: usize, total: usize, tally: Tally) -> RunState {
    if next >= total {
        RunState::Terminal(Terminal::Completed {
            successes: tally.successes,
            failures: tally.failures,
        })
    } else {
        RunState::ResolveAddress {
            index: next,
            total,
            tally,
        }
    }
}
