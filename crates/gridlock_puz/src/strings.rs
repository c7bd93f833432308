use std::io::Cursor;

use crate::{Context, PuzRead, PuzWrite, read, write};

/// The NUL-delimited text block that follows the grids: title, author,
/// copyright, the clue array and the optional notes
///
/// All strings are stored without their terminating NUL. An empty vector
/// doubles as "absent"; the distinction does not exist in the file either.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Strings {
    pub title: Vec<u8>,
    pub author: Vec<u8>,
    pub copyright: Vec<u8>,
    pub clues: Vec<Vec<u8>>,
    pub notes: Vec<u8>,
}

/// # Read
impl Strings {
    pub(crate) fn read_from(
        cursor: &mut Cursor<&[u8]>,
        clue_count: u16,
    ) -> read::Result<Self> {
        let title = cursor.read_str0().context("Title")?;
        let author = cursor.read_str0().context("Author")?;
        let copyright = cursor.read_str0().context("Copyright")?;

        let mut clues = Vec::with_capacity(usize::from(clue_count));

        for num in 0..clue_count {
            let clue = cursor.read_str0().map_err(|_| read::Error {
                kind: read::ErrorKind::ClueCountShort {
                    read: num,
                    expected: clue_count,
                },
                context: format!("Clue #{}", num + 1),
            })?;

            clues.push(clue);
        }

        // Notes are only present when bytes remain; a missing final NUL is
        // tolerated at the very end of the file
        let start = cursor.position() as usize;
        let notes = match cursor.read_str0() {
            Ok(notes) => notes,
            Err(_) => {
                let notes = cursor.get_ref()[start..].to_vec();
                cursor.set_position(cursor.get_ref().len() as u64);
                notes
            }
        };

        Ok(Strings {
            title,
            author,
            copyright,
            clues,
            notes,
        })
    }
}

/// # Write
impl Strings {
    pub(crate) fn write_with<W: PuzWrite>(&self, writer: &mut W) -> write::Result<()> {
        writer.write_str0(&self.title).context("Title")?;
        writer.write_str0(&self.author).context("Author")?;
        writer.write_str0(&self.copyright).context("Copyright")?;

        for (idx, clue) in self.clues.iter().enumerate() {
            let context = format!("Clue #{}", idx + 1);
            writer.write_str0(clue).context(context)?;
        }

        // The notes terminator is always emitted, even with no notes
        writer.write_str0(&self.notes).context("Notes")?;

        Ok(())
    }

    /// Bytes this block takes on disk
    pub(crate) fn byte_len(&self) -> usize {
        let clue_len: usize = self.clues.iter().map(|clue| clue.len() + 1).sum();

        self.title.len() + 1
            + self.author.len() + 1
            + self.copyright.len() + 1
            + clue_len
            + self.notes.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(bytes: &[u8], clue_count: u16) -> read::Result<Strings> {
        Strings::read_from(&mut Cursor::new(bytes), clue_count)
    }

    #[test]
    fn block_round_trips() {
        let strings = Strings {
            title: b"Monday".to_vec(),
            author: b"A. Setter".to_vec(),
            copyright: Vec::new(),
            clues: vec![b"First clue".to_vec(), b"Second clue".to_vec()],
            notes: b"a note".to_vec(),
        };

        let mut bytes = Vec::new();
        strings.write_with(&mut bytes).unwrap();
        assert_eq!(bytes.len(), strings.byte_len());

        let reread = read(&bytes, 2).unwrap();
        assert_eq!(reread, strings);
    }

    #[test]
    fn running_out_of_clues_is_reported() {
        let err = read(b"t\0a\0c\0only one\0", 2).unwrap_err();

        assert!(matches!(
            err.kind,
            read::ErrorKind::ClueCountShort {
                read: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn absent_notes_read_back_empty() {
        let strings = read(b"\0\0\0clue\0", 1).unwrap();

        assert!(strings.notes.is_empty());
        assert!(strings.title.is_empty());
    }
}
