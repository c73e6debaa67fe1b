use crate::Result;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write},
    path::PathBuf,
    sync::Arc,
};

#[cfg(test)]
use test_log::test;

// Seekable byte sources and sinks used by every serializable structure.
// Structures write themselves with the little-endian helpers below; loading
// reverses the exact byte stream, so a short read is always an error.

pub trait Reader: Read + Seek + Send + Sized {
    fn try_clone_independent(&self) -> std::io::Result<Self>;

    fn pos(&mut self) -> Result<i64> {
        Ok(self.stream_position()? as i64)
    }

    fn read_le_u64(&mut self) -> Result<u64> {
        let mut buf = [0_u8; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn read_byte_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0_u8; len];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }
}

pub trait Writer: Write + Seek + Send + Sized {
    type PairedReader: Reader;
    fn try_into_reader(self) -> std::io::Result<Self::PairedReader>;

    fn pos(&mut self) -> Result<i64> {
        Ok(self.stream_position()? as i64)
    }

    fn write_le_u64(&mut self, val: u64) -> Result<()> {
        self.write_all(&val.to_le_bytes())?;
        Ok(())
    }

    fn write_byte_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_all(bytes)?;
        Ok(())
    }
}

// MemReader

pub struct MemReader {
    mem: Cursor<Arc<[u8]>>,
}

impl MemReader {
    fn new(mem: Arc<[u8]>) -> Self {
        Self {
            mem: Cursor::new(mem),
        }
    }
}

impl From<Vec<u8>> for MemReader {
    fn from(vec: Vec<u8>) -> Self {
        let rc: Arc<[u8]> = Arc::from(vec);
        Self::new(rc)
    }
}

impl Read for MemReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.mem.read(buf)
    }
}

impl Seek for MemReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.mem.seek(pos)
    }
}

impl Reader for MemReader {
    fn try_clone_independent(&self) -> std::io::Result<Self> {
        let rc = self.mem.get_ref().clone();
        Ok(Self::new(rc))
    }
}

// MemWriter

pub struct MemWriter {
    mem: Cursor<Vec<u8>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self {
            mem: Cursor::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.mem.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem.get_ref().is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.mem.into_inner()
    }
}

impl Default for MemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MemWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.mem.write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.mem.flush()
    }
}

impl Seek for MemWriter {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.mem.seek(pos)
    }
}

impl Writer for MemWriter {
    type PairedReader = MemReader;
    fn try_into_reader(self) -> std::io::Result<Self::PairedReader> {
        let mem = self.mem.into_inner();
        let rc: Arc<[u8]> = Arc::from(mem);
        Ok(MemReader {
            mem: Cursor::new(rc),
        })
    }
}

// FileReader

pub struct FileReader {
    file: BufReader<File>,
    path: PathBuf,
}

impl FileReader {
    pub fn try_open_existing(path: PathBuf) -> std::io::Result<Self> {
        let file = File::open(&path)?;
        let file = BufReader::new(file);
        Ok(Self { file, path })
    }
}

impl Read for FileReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for FileReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

impl Reader for FileReader {
    fn try_clone_independent(&self) -> std::io::Result<Self> {
        FileReader::try_open_existing(self.path.clone())
    }
}

// FileWriter

pub struct FileWriter {
    file: BufWriter<File>,
    path: PathBuf,
}

impl FileWriter {
    pub fn try_create_non_existing(path: PathBuf) -> std::io::Result<Self> {
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        let file = BufWriter::new(file);
        Ok(Self { file, path })
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl Seek for FileWriter {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

impl Writer for FileWriter {
    type PairedReader = FileReader;
    fn try_into_reader(self) -> std::io::Result<Self::PairedReader> {
        let Self { mut file, path } = self;
        // Make extra sure we've flushed-and-closed before
        // opening to read.
        file.flush()?;
        let file = file.into_inner()?;
        file.sync_all()?;
        drop(file);
        FileReader::try_open_existing(path)
    }
}

#[test]
fn test_mem_round_trip() -> Result<()> {
    let mut w = MemWriter::new();
    w.write_le_u64(0xdead_beef_u64)?;
    w.write_byte_slice(&[1, 2, 3])?;
    let mut r = w.try_into_reader()?;
    assert_eq!(r.read_le_u64()?, 0xdead_beef_u64);
    assert_eq!(r.read_byte_vec(3)?, vec![1, 2, 3]);
    assert!(r.read_byte_vec(1).is_err());
    Ok(())
}

#[test]
fn test_file_round_trip() -> Result<()> {
    let path = std::env::temp_dir().join(format!("runmove-ioutil-{}.move", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let mut w = FileWriter::try_create_non_existing(path.clone())?;
    w.write_le_u64(42)?;
    let mut r = w.try_into_reader()?;
    assert_eq!(r.read_le_u64()?, 42);
    drop(r);
    std::fs::remove_file(&path)?;
    Ok(())
}
