use std::io::Cursor;
use std::time::Duration;

use gridlock_core::{Board, CellStyle, Timer, TimerState};

use crate::{
    Checksums, Context, PuzRead, PuzWrite, format,
    read::{self, ReadState},
    write,
};

/// Upper bound on a single rebus string, in bytes
pub const MAX_REBUS_LEN: usize = 100;

/// The optional tagged sections at the end of a container file
///
/// Each section carries a stored checksum of its payload; those arrive in
/// [`StoredSums`] so that [verification](crate::Puzzle::verify) can compare
/// them against freshly computed ones.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extras {
    /// `GRBS` + `RTBL`: per-cell rebus indices and the table they point into
    pub rebus: Option<Rebus>,

    /// `LTIM`: elapsed seconds and whether the clock is stopped
    pub timer: Option<Timer>,

    /// `GEXT`: one [style byte](CellStyle) per cell
    pub styles: Option<Board>,

    /// `RUSR`: the player's own rebus entry per cell, if any
    pub user_rebus: Option<UserRebus>,

    /// Checksums as stored in the file
    pub stored: StoredSums,
}

/// The per-section checksums read from (or committed to) the file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoredSums {
    pub grbs: u16,
    pub rtbl: u16,
    pub ltim: u16,
    pub gext: u16,
    pub rusr: u16,
}

/// Rebus overlay and table
///
/// An overlay cell of `0` means "no rebus"; `n > 0` points at table entry
/// `n - 1`. The table is kept as the ordered `"key:value"` fragments of the
/// on-disk string, split on the `;` separators.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Rebus {
    pub overlay: Board,
    pub table: Vec<Vec<u8>>,
}

impl Rebus {
    /// Whether any cell actually points into the table
    pub fn is_present(&self) -> bool {
        self.overlay.cells().iter().any(|&cell| cell != 0)
    }

    /// The `n`th table entry, by position in the table
    ///
    /// This is list order, unrelated to the numeric keys inside the
    /// fragments.
    pub fn entry(&self, n: usize) -> Option<&[u8]> {
        self.table.get(n).map(Vec::as_slice)
    }

    /// The on-disk table form: every fragment followed by a `;`
    pub fn table_text(&self) -> Vec<u8> {
        let mut text = Vec::new();

        for entry in &self.table {
            text.extend_from_slice(entry);
            text.push(b';');
        }

        text
    }

    /// Split the on-disk form back into fragments, dropping the empty
    /// trailing piece
    pub fn parse_table(text: &[u8]) -> Vec<Vec<u8>> {
        text.split(|&byte| byte == b';')
            .filter(|entry| !entry.is_empty())
            .map(<[u8]>::to_vec)
            .collect()
    }
}

/// The player's rebus entries, one optional string per cell
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserRebus {
    pub cells: Vec<Option<Vec<u8>>>,
}

impl UserRebus {
    /// The cell strings as they sit in the file: bytes plus NUL for a
    /// filled cell, a lone NUL for an empty one. The outer section
    /// terminator is not included.
    pub fn wire_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.wire_len());

        for cell in &self.cells {
            if let Some(entry) = cell {
                bytes.extend_from_slice(entry);
            }
            bytes.push(b'\0');
        }

        bytes
    }

    pub fn wire_len(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| cell.as_ref().map_or(0, Vec::len) + 1)
            .sum()
    }
}

/// The `LTIM` payload: `"<elapsed>,<stopped>"` in ASCII
pub(crate) fn timer_text(timer: &Timer) -> Vec<u8> {
    format!("{},{}", timer.elapsed().as_secs(), timer.state()).into_bytes()
}

pub(crate) fn parse_timer(text: &[u8]) -> format::Result<Timer> {
    let err = |reason: String| format::Error::InvalidTimer { reason };

    let text = std::str::from_utf8(text).map_err(|_| err("timer text is not ASCII".into()))?;

    let (elapsed, stopped) = text.split_once(',').ok_or_else(|| {
        err(format!(
            "expected '<elapsed>,<stopped>', found '{text}'"
        ))
    })?;

    let secs: u64 = elapsed
        .parse()
        .map_err(|_| err(format!("'{elapsed}' is not a number of seconds")))?;

    let state: u8 = stopped
        .parse()
        .map_err(|_| err(format!("'{stopped}' is not 0 or 1")))?;
    let state = TimerState::try_from(state)
        .map_err(|byte| err(format!("{byte} does not name a timer state")))?;

    Ok(Timer::new(Duration::from_secs(secs), state))
}

/// # Read
impl Extras {
    pub(crate) fn read_from(
        cursor: &mut Cursor<&[u8]>,
        width: u8,
        height: u8,
        state: &mut ReadState,
    ) -> read::Result<Self> {
        let area = usize::from(width) * usize::from(height);
        let mut extras = Extras::default();

        // Tag dispatch runs as long as a tag and length can still fit
        while remaining(cursor) > 5 {
            let tag = cursor.read_slice::<4>().context("Section tag")?;
            let len = cursor.read_u16().context("Section length")?;
            let start = cursor.position();

            match &tag {
                b"GRBS" => extras.read_grbs(cursor, width, area, len, state)?,
                b"LTIM" => extras.read_ltim(cursor, len, state)?,
                b"GEXT" => extras.read_gext(cursor, width, area, len, state)?,
                b"RUSR" => extras.read_rusr(cursor, area, state)?,

                tag => {
                    let result: read::Result<()> = Err(read::Error {
                        kind: read::ErrorKind::UnknownSection {
                            tag: String::from_utf8_lossy(tag).into_owned(),
                        },
                        context: "Extra sections".into(),
                    });
                    state.ok_or_warn(result)?;

                    let skip = (usize::from(len) + 1).min(remaining(cursor));
                    cursor.skip(skip).context("Unknown section")?;
                }
            }

            if cursor.position() == start {
                return Err(malformed(&tag, "section reader did not advance"));
            }
        }

        Ok(extras)
    }

    fn read_grbs(
        &mut self,
        cursor: &mut Cursor<&[u8]>,
        width: u8,
        area: usize,
        len: u16,
        state: &mut ReadState,
    ) -> read::Result<()> {
        if usize::from(len) != area {
            let result: read::Result<()> = Err(malformed(
                b"GRBS",
                &format!("length {len} does not match the {area}-cell grid"),
            ));
            state.ok_or_warn(result)?;
        }

        self.stored.grbs = cursor.read_u16().context("GRBS checksum")?;
        let overlay = cursor.read_vec(area).context("GRBS overlay")?;
        read_terminator(cursor, b"GRBS", state)?;

        // An overlay without a single rebus cell is dropped outright
        let present = overlay.iter().any(|&cell| cell != 0);

        // The table has to follow a non-empty overlay immediately; for an
        // empty one it is consumed and ignored if it happens to be there
        if peek_tag(cursor) != Some(*b"RTBL") {
            return match present {
                false => Ok(()),
                true => Err(read::Error {
                    kind: read::ErrorKind::MissingRtbl,
                    context: "GRBS".into(),
                }),
            };
        }

        cursor.skip(4).context("RTBL tag")?;
        let table_len = cursor.read_u16().context("RTBL length")?;
        let table_cksum = cursor.read_u16().context("RTBL checksum")?;
        let text = cursor
            .read_vec(usize::from(table_len))
            .context("RTBL table")?;
        read_terminator(cursor, b"RTBL", state)?;

        if present {
            self.stored.rtbl = table_cksum;
            self.rebus = Some(Rebus {
                overlay: Board::from_vec(overlay, width).context("GRBS overlay")?,
                table: Rebus::parse_table(&text),
            });
        }

        Ok(())
    }

    fn read_ltim(
        &mut self,
        cursor: &mut Cursor<&[u8]>,
        len: u16,
        state: &mut ReadState,
    ) -> read::Result<()> {
        self.stored.ltim = cursor.read_u16().context("LTIM checksum")?;
        let text = cursor.read_vec(usize::from(len)).context("LTIM text")?;
        read_terminator(cursor, b"LTIM", state)?;

        let timer = parse_timer(&text).context("LTIM");
        self.timer = state.ok_or_warn(timer)?;

        Ok(())
    }

    fn read_gext(
        &mut self,
        cursor: &mut Cursor<&[u8]>,
        width: u8,
        area: usize,
        len: u16,
        state: &mut ReadState,
    ) -> read::Result<()> {
        if usize::from(len) != area {
            let result: read::Result<()> = Err(malformed(
                b"GEXT",
                &format!("length {len} does not match the {area}-cell grid"),
            ));
            state.ok_or_warn(result)?;
        }

        self.stored.gext = cursor.read_u16().context("GEXT checksum")?;
        let overlay = cursor.read_vec(area).context("GEXT overlay")?;
        read_terminator(cursor, b"GEXT", state)?;

        self.styles = Some(Board::from_vec(overlay, width).context("GEXT overlay")?);

        Ok(())
    }

    fn read_rusr(
        &mut self,
        cursor: &mut Cursor<&[u8]>,
        area: usize,
        state: &mut ReadState,
    ) -> read::Result<()> {
        self.stored.rusr = cursor.read_u16().context("RUSR checksum")?;

        let mut cells = Vec::with_capacity(area);

        for num in 0..area {
            let context = format!("RUSR cell #{}", num + 1);
            let entry = cursor
                .read_str0_bounded(MAX_REBUS_LEN)
                .context(context)?;

            cells.push((!entry.is_empty()).then_some(entry));
        }

        read_terminator(cursor, b"RUSR", state)?;
        self.user_rebus = Some(UserRebus { cells });

        Ok(())
    }
}

/// # Write
impl Extras {
    pub(crate) fn write_with<W: PuzWrite>(
        &self,
        writer: &mut W,
        sums: &Checksums,
    ) -> write::Result<()> {
        // An overlay nobody points into is not worth a section
        if let Some(rebus) = &self.rebus
            && rebus.is_present()
        {
            let overlay = rebus.overlay.cells();

            writer.write_all(b"GRBS").context("GRBS tag")?;
            writer.write_u16(section_len(b"GRBS", overlay.len())?).context("GRBS length")?;
            writer.write_u16(sums.grbs).context("GRBS checksum")?;
            writer.write_str0(overlay).context("GRBS overlay")?;

            let text = rebus.table_text();

            writer.write_all(b"RTBL").context("RTBL tag")?;
            writer.write_u16(section_len(b"RTBL", text.len())?).context("RTBL length")?;
            writer.write_u16(sums.rtbl).context("RTBL checksum")?;
            writer.write_str0(&text).context("RTBL table")?;
        }

        if let Some(timer) = &self.timer {
            let text = timer_text(timer);

            writer.write_all(b"LTIM").context("LTIM tag")?;
            writer.write_u16(section_len(b"LTIM", text.len())?).context("LTIM length")?;
            writer.write_u16(sums.ltim).context("LTIM checksum")?;
            writer.write_str0(&text).context("LTIM text")?;
        }

        if let Some(styles) = &self.styles {
            writer.write_all(b"GEXT").context("GEXT tag")?;
            writer
                .write_u16(section_len(b"GEXT", styles.area())?)
                .context("GEXT length")?;
            writer.write_u16(sums.gext).context("GEXT checksum")?;
            writer.write_str0(styles.cells()).context("GEXT overlay")?;
        }

        if let Some(user_rebus) = &self.user_rebus {
            let wire = user_rebus.wire_bytes();

            writer.write_all(b"RUSR").context("RUSR tag")?;
            writer.write_u16(section_len(b"RUSR", wire.len())?).context("RUSR length")?;
            writer.write_u16(sums.rusr).context("RUSR checksum")?;
            writer.write_str0(&wire).context("RUSR cells")?;
        }

        Ok(())
    }

    /// Bytes all present sections take on disk
    pub(crate) fn byte_len(&self) -> usize {
        // Tag, length and checksum, plus the payload terminator
        const FRAME: usize = 4 + 2 + 2 + 1;

        let mut len = 0;

        if let Some(rebus) = &self.rebus
            && rebus.is_present()
        {
            len += FRAME + rebus.overlay.area();
            len += FRAME + rebus.table_text().len();
        }

        if let Some(timer) = &self.timer {
            len += FRAME + timer_text(timer).len();
        }

        if let Some(styles) = &self.styles {
            len += FRAME + styles.area();
        }

        if let Some(user_rebus) = &self.user_rebus {
            len += FRAME + user_rebus.wire_len();
        }

        len
    }

    /// Per-cell [style](CellStyle), empty when no `GEXT` section is present
    pub fn style_at(&self, index: usize) -> CellStyle {
        self.styles
            .as_ref()
            .and_then(|styles| styles.cells().get(index))
            .map(|&byte| CellStyle::from_byte(byte))
            .unwrap_or_default()
    }
}

fn remaining(cursor: &Cursor<&[u8]>) -> usize {
    cursor.get_ref().len() - cursor.position() as usize
}

fn peek_tag(cursor: &Cursor<&[u8]>) -> Option<[u8; 4]> {
    let pos = cursor.position() as usize;
    let bytes = cursor.get_ref();

    bytes.get(pos..pos + 4)?.try_into().ok()
}

fn malformed(tag: &[u8], reason: &str) -> read::Error {
    read::Error {
        kind: read::ErrorKind::MalformedExtension {
            tag: String::from_utf8_lossy(tag).into_owned(),
            reason: reason.into(),
        },
        context: "Extra sections".into(),
    }
}

/// The payload terminator; a missing one is fatal only in strict mode
fn read_terminator(
    cursor: &mut Cursor<&[u8]>,
    tag: &[u8],
    state: &mut ReadState,
) -> read::Result<()> {
    let byte = cursor.read_u8().context("Section terminator")?;

    if byte != 0 {
        state.ok_or_warn::<()>(Err(malformed(tag, "payload is not NUL-terminated")))?;
    }

    Ok(())
}

fn section_len(tag: &[u8], len: usize) -> write::Result<u16> {
    u16::try_from(len).map_err(|_| write::Error {
        kind: write::ErrorKind::Format(format::Error::SizeOverflow {
            kind: "extension section",
            size: len,
            max_size: usize::from(u16::MAX),
        }),
        context: String::from_utf8_lossy(tag).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn read(bytes: &[u8], width: u8, height: u8) -> read::Result<Extras> {
        let mut state = ReadState::new(true);
        Extras::read_from(&mut Cursor::new(bytes), width, height, &mut state)
    }

    #[test]
    fn all_zero_overlay_is_dropped() {
        // GRBS of four zero cells followed by a table nobody points into
        let bytes = b"GRBS\x04\x00\x34\x12\x00\x00\x00\x00\0RTBL\x05\x00\x99\x99 1:A;\0";
        let extras = read(bytes, 2, 2).unwrap();

        assert!(extras.rebus.is_none());
        assert_eq!(extras.stored.rtbl, 0);
    }

    #[test]
    fn missing_table_after_live_overlay_is_fatal() {
        let bytes = b"GRBS\x04\x00\x34\x12\x01\x00\x00\x00\0";
        let err = read(bytes, 2, 2).unwrap_err();

        assert!(matches!(err.kind, read::ErrorKind::MissingRtbl));
    }

    #[test]
    fn rebus_sections_round_trip() {
        let rebus = Rebus {
            overlay: Board::from_vec(vec![1, 0, 0, 2], 2).unwrap(),
            table: vec![b" 0:HEART".to_vec(), b" 1:SPADE".to_vec()],
        };

        assert_eq!(rebus.table_text(), b" 0:HEART; 1:SPADE;");
        assert_eq!(Rebus::parse_table(&rebus.table_text()), rebus.table);
        assert_eq!(rebus.entry(1), Some(b" 1:SPADE".as_slice()));
        assert_eq!(rebus.entry(2), None);
    }

    #[rstest]
    #[case(b"42,1", 42, TimerState::Stopped)]
    #[case(b"0,0", 0, TimerState::Running)]
    fn timer_text_round_trips(
        #[case] text: &[u8],
        #[case] secs: u64,
        #[case] state: TimerState,
    ) {
        let timer = parse_timer(text).unwrap();

        assert_eq!(timer.elapsed(), Duration::from_secs(secs));
        assert_eq!(timer.state(), state);
        assert_eq!(timer_text(&timer), text);
    }

    #[rstest]
    #[case(b"42".as_slice())]
    #[case(b"x,1".as_slice())]
    #[case(b"1,2".as_slice())]
    fn junk_timers_are_rejected(#[case] text: &[u8]) {
        assert!(parse_timer(text).is_err());
    }

    #[test]
    fn user_rebus_wire_form() {
        let rusr = UserRebus {
            cells: vec![Some(b"TEN".to_vec()), None, Some(b"SIX".to_vec())],
        };

        assert_eq!(rusr.wire_bytes(), b"TEN\0\0SIX\0");
        assert_eq!(rusr.wire_len(), 9);
    }

    #[test]
    fn user_rebus_reads_back() {
        let bytes = b"RUSR\x09\x00\x00\x00TEN\0\0SIX\0\0";
        let extras = read(bytes, 3, 1).unwrap();

        let rusr = extras.user_rebus.unwrap();
        assert_eq!(rusr.cells[0].as_deref(), Some(b"TEN".as_slice()));
        assert_eq!(rusr.cells[1], None);
        assert_eq!(rusr.cells[2].as_deref(), Some(b"SIX".as_slice()));
    }

    #[test]
    fn unknown_sections_are_skipped_leniently() {
        // An unknown WXYZ section, then a valid LTIM
        let mut bytes = b"WXYZ\x03\x00abc\0".to_vec();
        bytes.extend_from_slice(b"LTIM\x04\x00\x00\x0042,1\0");

        let mut state = ReadState::new(false);
        let extras =
            Extras::read_from(&mut Cursor::new(bytes.as_slice()), 2, 2, &mut state).unwrap();

        assert!(extras.timer.is_some());
        assert_eq!(state.warnings.len(), 1);
    }
}
