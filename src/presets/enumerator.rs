// Copyright (c) 2023 Mike Tsao. All rights reserved.

use derivative::Derivative;
use eagan_sync_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use strum_macros::Display;

/// Where a [PresetEnumerator] is in its request/acknowledge cycle.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum ScanState {
    /// Nothing has been requested yet.
    #[default]
    Start,
    /// A preset was requested and the device hasn't said it's loading.
    PendingPresetBegin,
    /// The device is loading. Its values are arriving.
    PendingPresetReceived,
    /// Loaded. Waiting for the device to quiet down before the next request.
    Settle,
    /// Free to request the next preset.
    Ready,
    /// Every slot has been visited, or the device stopped answering.
    End,
}

/// The caller's view of a [Poll].
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ScanStatus {
    Ready,
    Waiting,
    Timeout,
    Fail,
    End,
}

/// The device keeps its presets under two tabs, each spanning a run of pages.
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PresetTab {
    /// Factory presets.
    #[default]
    System,
    /// Presets the player saved.
    User,
}
impl PresetTab {
    /// The pages this tab occupies.
    pub const fn pages(&self) -> PageWindow {
        match self {
            PresetTab::System => PageWindow::new(30, 34),
            PresetTab::User => PageWindow::new(0, 0),
        }
    }
}

/// An inclusive run of preset pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    base: u8,
    last: u8,
}
#[allow(missing_docs)]
impl PageWindow {
    /// A `last` below `base` collapses to a single page.
    ///
    /// # Panics
    ///
    /// If either page is above [MAX_DATA_BYTE], since bank select couldn't
    /// address it.
    pub const fn new(base: u8, last: u8) -> Self {
        assert!(
            base <= MAX_DATA_BYTE && last <= MAX_DATA_BYTE,
            "preset pages are 7-bit"
        );
        Self {
            base,
            last: if last < base { base } else { last },
        }
    }

    pub const fn base(&self) -> u8 {
        self.base
    }

    pub const fn last(&self) -> u8 {
        self.last
    }

    pub const fn page_count(&self) -> usize {
        self.last.saturating_sub(self.base) as usize + 1
    }

    pub const fn slot_count(&self) -> usize {
        self.page_count() * PresetId::SLOTS_PER_PAGE
    }

    pub const fn contains(&self, page: u8) -> bool {
        page >= self.base && page <= self.last
    }
}
impl Default for PageWindow {
    fn default() -> Self {
        PresetTab::default().pages()
    }
}

/// How long each phase of a preset request may take.
#[derive(Clone, Copy, Debug, Derivative, PartialEq, Eq)]
#[derivative(Default)]
pub struct ScanTimeouts {
    /// How long the device has to start loading. Missing it skips the slot.
    #[derivative(Default(value = "Duration::from_millis(750)"))]
    pub start: Duration,
    /// How long a load may take once started. Missing it ends the scan.
    #[derivative(Default(value = "Duration::from_millis(2500)"))]
    pub response: Duration,
    /// The quiet period after a load before the next request.
    #[derivative(Default(value = "Duration::from_millis(2000)"))]
    pub settle: Duration,
}

/// What [ReadyScan::next()] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Requested this preset.
    Sent(PresetId),
    /// There was nothing left to request. The scan is over.
    Exhausted,
}

/// Walks every preset slot in a tab, asking the device to load each one in
/// turn so that whoever listens to its replies can catalog them.
///
/// The device confirms each load in two steps, reported through
/// [PresetEnumerator::preset_started()] and
/// [PresetEnumerator::preset_received()]. The host polls
/// [PresetEnumerator::ready()] every tick; when it yields a [ReadyScan], the
/// host may advance to the next slot.
#[derive(Debug)]
pub struct PresetEnumerator<C = SystemClock> {
    clock: C,
    tag: ClientTag,
    timeouts: ScanTimeouts,

    state: ScanState,
    state_time: Instant,

    tab: PresetTab,
    window: PageWindow,
    cursor: PresetId,
}
impl Default for PresetEnumerator<SystemClock> {
    fn default() -> Self {
        Self::new_with(SystemClock, ClientTag::default())
    }
}
impl<C: Clock> PresetEnumerator<C> {
    #[allow(missing_docs)]
    pub fn new_with(clock: C, tag: ClientTag) -> Self {
        let state_time = clock.now();
        let window = PageWindow::default();
        Self {
            clock,
            tag,
            timeouts: ScanTimeouts::default(),
            state: ScanState::default(),
            state_time,
            tab: PresetTab::default(),
            window,
            cursor: PresetId::new(window.base(), 0),
        }
    }

    /// Replaces the default phase deadlines.
    pub fn with_timeouts(mut self, timeouts: ScanTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Starts a scan of the factory presets.
    pub fn init_system<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), TransportError> {
        self.init_pages(PresetTab::System, PresetTab::System.pages(), transport)
    }

    /// Starts a scan of the player's presets.
    pub fn init_user<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<(), TransportError> {
        self.init_pages(PresetTab::User, PresetTab::User.pages(), transport)
    }

    /// Starts a scan over an arbitrary run of pages, requesting the first
    /// slot right away.
    ///
    /// An enumerator scans once. After the scan has started, this does
    /// nothing; a new scan needs a new enumerator.
    pub fn init_pages<T: Transport + ?Sized>(
        &mut self,
        tab: PresetTab,
        window: PageWindow,
        transport: &mut T,
    ) -> Result<(), TransportError> {
        if self.state != ScanState::Start {
            log::debug!(
                "[{}] ignoring request to scan {tab} presets while {}",
                self.tag,
                self.state
            );
            return Ok(());
        }
        self.tab = tab;
        self.window = window;
        self.cursor = PresetId::new(window.base(), 0);
        log::debug!(
            "[{}] scanning {tab} presets, pages {}..={}",
            self.tag,
            window.base(),
            window.last()
        );
        self.send(transport)
    }

    /// Requests the preset under the cursor and waits for the device to
    /// start loading it.
    ///
    /// The state moves on even if the transport fails. A request that never
    /// arrived looks the same as one the device ignored, and shows up later
    /// as a [ScanStatus::Timeout].
    fn send<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<(), TransportError> {
        let result = transport.select_preset(self.tag, self.cursor);
        self.transition(ScanState::PendingPresetBegin);
        log::trace!("[{}] requested preset {}", self.tag, self.cursor);
        result
    }

    /// The device started loading. Returns false, and does nothing, if no
    /// request was waiting for that.
    pub fn preset_started(&mut self) -> bool {
        self.accept(ScanState::PendingPresetBegin, ScanState::PendingPresetReceived)
    }

    /// The device finished loading. Returns false, and does nothing, if no
    /// load was in progress.
    pub fn preset_received(&mut self) -> bool {
        self.accept(ScanState::PendingPresetReceived, ScanState::Settle)
    }

    fn accept(&mut self, expected: ScanState, next: ScanState) -> bool {
        if self.state == expected {
            self.transition(next);
            true
        } else {
            log::debug!(
                "[{}] ignoring acknowledgment for {} while {}",
                self.tag,
                self.cursor,
                self.state
            );
            false
        }
    }

    /// Checks the clock and reports whether the scan can move on.
    ///
    /// Only [Poll::Ready] and [Poll::Timeout] carry a [ReadyScan], so nothing
    /// can advance the cursor while a request is outstanding.
    pub fn ready(&mut self) -> Poll<'_, C> {
        let elapsed = self
            .clock
            .now()
            .saturating_duration_since(self.state_time);
        match self.state {
            ScanState::Start | ScanState::Ready => Poll::Ready(ReadyScan { scan: self }),
            ScanState::PendingPresetBegin => {
                if elapsed > self.timeouts.start {
                    log::debug!("[{}] preset {} never started; skipping", self.tag, self.cursor);
                    self.transition(ScanState::Ready);
                    Poll::Timeout(ReadyScan { scan: self })
                } else {
                    Poll::Waiting
                }
            }
            ScanState::PendingPresetReceived => {
                if elapsed > self.timeouts.response {
                    log::warn!(
                        "[{}] preset {} started but never finished; ending scan",
                        self.tag,
                        self.cursor
                    );
                    self.transition(ScanState::End);
                    Poll::Fail
                } else {
                    Poll::Waiting
                }
            }
            ScanState::Settle => {
                if elapsed > self.timeouts.settle {
                    self.transition(ScanState::Ready);
                    Poll::Ready(ReadyScan { scan: self })
                } else {
                    Poll::Waiting
                }
            }
            ScanState::End => Poll::End,
        }
    }

    fn transition(&mut self, state: ScanState) {
        self.state = state;
        self.state_time = self.clock.now();
    }

    #[allow(missing_docs)]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// The preset most recently requested, or about to be.
    pub fn cursor(&self) -> PresetId {
        self.cursor
    }

    #[allow(missing_docs)]
    pub fn tab(&self) -> PresetTab {
        self.tab
    }

    #[allow(missing_docs)]
    pub fn window(&self) -> PageWindow {
        self.window
    }

    #[allow(missing_docs)]
    pub fn timeouts(&self) -> ScanTimeouts {
        self.timeouts
    }

    #[allow(missing_docs)]
    pub fn tag(&self) -> ClientTag {
        self.tag
    }

    /// The cursor's position within the window, counting from zero.
    pub fn slot_index(&self) -> usize {
        (self.cursor.page.saturating_sub(self.window.base()) as usize)
            * PresetId::SLOTS_PER_PAGE
            + self.cursor.slot as usize
    }

    /// How many slots the window holds.
    pub fn slot_count(&self) -> usize {
        self.window.slot_count()
    }
}

/// The result of [PresetEnumerator::ready()].
#[derive(Debug)]
pub enum Poll<'a, C = SystemClock> {
    /// Free to advance.
    Ready(ReadyScan<'a, C>),
    /// A request is outstanding and hasn't timed out.
    Waiting,
    /// The device never started loading the last request. The slot was
    /// skipped and the scan may advance.
    Timeout(ReadyScan<'a, C>),
    /// The device started a load and never finished it. The scan is over.
    Fail,
    /// The scan is over.
    End,
}
impl<'a, C: Clock> Poll<'a, C> {
    #[allow(missing_docs)]
    pub fn status(&self) -> ScanStatus {
        match self {
            Poll::Ready(_) => ScanStatus::Ready,
            Poll::Waiting => ScanStatus::Waiting,
            Poll::Timeout(_) => ScanStatus::Timeout,
            Poll::Fail => ScanStatus::Fail,
            Poll::End => ScanStatus::End,
        }
    }

    /// The handle, if this poll carries one.
    pub fn into_ready(self) -> Option<ReadyScan<'a, C>> {
        match self {
            Poll::Ready(scan) | Poll::Timeout(scan) => Some(scan),
            _ => None,
        }
    }
}

/// Permission to advance a [PresetEnumerator], handed out only when it's
/// between requests.
#[derive(Debug)]
pub struct ReadyScan<'a, C = SystemClock> {
    scan: &'a mut PresetEnumerator<C>,
}
impl<'a, C: Clock> ReadyScan<'a, C> {
    /// Moves to the next slot, rolling over into the next page after the
    /// last slot, and requests it. Before the first request, requests the
    /// starting slot instead of moving.
    pub fn next<T: Transport + ?Sized>(self, transport: &mut T) -> Result<Advance, TransportError> {
        let scan = self.scan;
        if scan.state != ScanState::Start {
            if scan.cursor.slot < PresetId::LAST_SLOT {
                scan.cursor.slot += 1;
            } else if scan.cursor.page >= scan.window.last() {
                log::debug!("[{}] scan of {} presets complete", scan.tag, scan.tab);
                scan.transition(ScanState::End);
                return Ok(Advance::Exhausted);
            } else {
                scan.cursor = PresetId::new(scan.cursor.page + 1, 0);
            }
        }
        scan.send(transport)?;
        Ok(Advance::Sent(scan.cursor))
    }

    /// The preset the scan is sitting on.
    pub fn cursor(&self) -> PresetId {
        self.scan.cursor
    }
}
