use accent_protocol::text::is_trivial;
use accent_protocol::{
    AccentPartition, AccentRecord, AmbiguousReadingRecord, HomographPartition, HomographRecord,
    ReadingRecord, StressPosition, UnresolvablePartition, UnresolvableRecord, FORMAT_VERSION,
};
use rkyv::AlignedVec;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::dictionary::{AccentDictionary, MergePolicy, Partitions, SizeDelta};
use crate::entry::{Homograph, Reading, Unresolvable};
use crate::error::{Result, StoreError};

pub const ACCENTS_FILE: &str = "accents.rkyv";
pub const HOMOGRAPHS_FILE: &str = "homographs.rkyv";
pub const UNRESOLVABLE_FILE: &str = "homographs_unresolvable.rkyv";

macro_rules! decode_partition {
    ($ty:ty, $bytes:expr, $path:expr) => {
        rkyv::from_bytes::<$ty>($bytes).map_err(|e| StoreError::Decode {
            path: $path.to_path_buf(),
            message: e.to_string(),
        })
    };
}

macro_rules! encode_partition {
    ($value:expr, $path:expr) => {
        rkyv::to_bytes::<_, 4096>($value).map_err(|e| StoreError::Encode {
            path: $path.to_path_buf(),
            message: e.to_string(),
        })
    };
}

/// Directory holding the three archived partitions.
///
/// The store is owned by one session at a time; nothing guards against a second writer.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    dir: PathBuf,
}

impl DictionaryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, partition: Partitions) -> PathBuf {
        let name = if partition == Partitions::ACCENTS {
            ACCENTS_FILE
        } else if partition == Partitions::HOMOGRAPHS {
            HOMOGRAPHS_FILE
        } else {
            UNRESOLVABLE_FILE
        };
        self.dir.join(name)
    }

    pub fn load(&self) -> Result<AccentDictionary> {
        self.load_with_policy(MergePolicy::default())
    }

    /// Loads whichever partitions exist; a missing file is an empty partition.
    pub fn load_with_policy(&self, policy: MergePolicy) -> Result<AccentDictionary> {
        let mut dict = AccentDictionary::with_policy(policy);

        let path = self.path(Partitions::ACCENTS);
        if let Some(bytes) = read_aligned(&path)? {
            let partition = decode_partition!(AccentPartition, &bytes, path)?;
            check_version(&path, partition.version)?;
            for record in partition.records {
                ensure_new(&dict, &record.word)?;
                dict.accents.insert(record.word, record.position);
            }
        }

        let path = self.path(Partitions::HOMOGRAPHS);
        if let Some(bytes) = read_aligned(&path)? {
            let partition = decode_partition!(HomographPartition, &bytes, path)?;
            check_version(&path, partition.version)?;
            for record in partition.records {
                ensure_new(&dict, &record.word)?;
                let homograph = homograph_from_record(&record)?;
                dict.homographs.insert(record.word, homograph);
            }
        }

        let path = self.path(Partitions::UNRESOLVABLE);
        if let Some(bytes) = read_aligned(&path)? {
            let partition = decode_partition!(UnresolvablePartition, &bytes, path)?;
            check_version(&path, partition.version)?;
            for record in partition.records {
                ensure_new(&dict, &record.word)?;
                let unresolvable = unresolvable_from_record(&record)?;
                dict.unresolvable.insert(record.word, unresolvable);
            }
        }

        dict.mark_loaded();
        let sizes = dict.sizes();
        tracing::info!(
            dir = %self.dir.display(),
            accents = sizes.accents,
            homographs = sizes.homographs,
            unresolvable = sizes.unresolvable,
            "loaded accent dictionary"
        );
        Ok(dict)
    }

    /// Writes every partition touched since load (plus any that has no file yet) and
    /// returns the net size change since load.
    pub fn save(&self, dict: &mut AccentDictionary) -> Result<SizeDelta> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let mut pending = dict.touched();
        for partition in [Partitions::ACCENTS, Partitions::HOMOGRAPHS, Partitions::UNRESOLVABLE] {
            if !self.path(partition).exists() {
                pending |= partition;
            }
        }

        if pending.contains(Partitions::ACCENTS) {
            let path = self.path(Partitions::ACCENTS);
            let bytes = encode_partition!(&accent_partition(dict), path)?;
            write_atomic(&path, &bytes)?;
        }
        if pending.contains(Partitions::HOMOGRAPHS) {
            let path = self.path(Partitions::HOMOGRAPHS);
            let bytes = encode_partition!(&homograph_partition(dict), path)?;
            write_atomic(&path, &bytes)?;
        }
        if pending.contains(Partitions::UNRESOLVABLE) {
            let path = self.path(Partitions::UNRESOLVABLE);
            let bytes = encode_partition!(&unresolvable_partition(dict), path)?;
            write_atomic(&path, &bytes)?;
        }

        dict.mark_saved();
        let delta = dict.delta();
        tracing::info!(
            accents = delta.accents,
            homographs = delta.homographs,
            unresolvable = delta.unresolvable,
            "saved accent dictionary"
        );
        Ok(delta)
    }

    pub fn save_if_changed(&self, dict: &mut AccentDictionary) -> Result<Option<SizeDelta>> {
        if !dict.is_dirty() {
            return Ok(None);
        }
        self.save(dict).map(Some)
    }
}

fn read_aligned(path: &Path) -> Result<Option<AlignedVec>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    // rkyv needs the archive aligned; a plain Vec<u8> gives no guarantee.
    let mut aligned = AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(&bytes);
    Ok(Some(aligned))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    temp.write_all(bytes).map_err(|e| StoreError::io(temp.path(), e))?;
    temp.as_file().sync_all().map_err(|e| StoreError::io(path, e))?;
    temp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

fn check_version(path: &Path, found: u32) -> Result<()> {
    if found != FORMAT_VERSION {
        return Err(StoreError::Version {
            path: path.to_path_buf(),
            found,
            expected: FORMAT_VERSION,
        });
    }
    Ok(())
}

fn ensure_new(dict: &AccentDictionary, word: &str) -> Result<()> {
    if is_trivial(word) {
        return Err(StoreError::corrupt(word, "word has fewer than two vowels"));
    }
    if dict.contains(word) {
        return Err(StoreError::corrupt(word, "word is stored more than once"));
    }
    Ok(())
}

fn homograph_from_record(record: &HomographRecord) -> Result<Homograph> {
    if record.readings.is_empty() {
        return Err(StoreError::corrupt(&record.word, "homograph without readings"));
    }
    let mut by_reading = HashMap::with_capacity(record.readings.len());
    for reading in &record.readings {
        if by_reading.insert(Reading::from(reading.key.clone()), reading.position).is_some() {
            return Err(StoreError::corrupt(&record.word, "reading listed twice"));
        }
    }
    let positions: BTreeSet<StressPosition> = by_reading.values().copied().collect();
    if positions != record.positions.iter().copied().collect::<BTreeSet<_>>() {
        return Err(StoreError::corrupt(&record.word, "positions disagree with readings"));
    }
    Ok(Homograph { positions, by_reading })
}

fn unresolvable_from_record(record: &UnresolvableRecord) -> Result<Unresolvable> {
    if record.readings.is_empty() {
        return Err(StoreError::corrupt(&record.word, "unresolvable entry without readings"));
    }
    let mut by_reading = HashMap::with_capacity(record.readings.len());
    for reading in &record.readings {
        let set: BTreeSet<StressPosition> = reading.positions.iter().copied().collect();
        if set.is_empty() {
            return Err(StoreError::corrupt(&record.word, "reading without positions"));
        }
        if by_reading.insert(Reading::from(reading.key.clone()), set).is_some() {
            return Err(StoreError::corrupt(&record.word, "reading listed twice"));
        }
    }
    let positions: BTreeSet<StressPosition> = by_reading.values().flatten().copied().collect();
    if positions != record.positions.iter().copied().collect::<BTreeSet<_>>() {
        return Err(StoreError::corrupt(&record.word, "positions disagree with readings"));
    }
    Ok(Unresolvable { positions, by_reading })
}

// Records are sorted so that saving the same dictionary twice yields identical files.

/// Snapshot of the resolved partition, sorted by word.
pub fn accent_partition(dict: &AccentDictionary) -> AccentPartition {
    let mut records: Vec<AccentRecord> = dict
        .accents()
        .map(|(word, position)| AccentRecord { word: word.to_owned(), position })
        .collect();
    records.sort_by(|a, b| a.word.cmp(&b.word));
    AccentPartition::new(records)
}

pub fn homograph_partition(dict: &AccentDictionary) -> HomographPartition {
    let mut records: Vec<HomographRecord> = dict
        .homographs()
        .map(|(word, homograph)| {
            let mut readings: Vec<ReadingRecord> = homograph
                .readings()
                .map(|(reading, position)| ReadingRecord { key: reading.key().cloned(), position })
                .collect();
            readings.sort_by(|a, b| a.key.cmp(&b.key));
            HomographRecord {
                word: word.to_owned(),
                positions: homograph.positions().iter().copied().collect(),
                readings,
            }
        })
        .collect();
    records.sort_by(|a, b| a.word.cmp(&b.word));
    HomographPartition::new(records)
}

pub fn unresolvable_partition(dict: &AccentDictionary) -> UnresolvablePartition {
    let mut records: Vec<UnresolvableRecord> = dict
        .unresolvable()
        .map(|(word, entry)| {
            let mut readings: Vec<AmbiguousReadingRecord> = entry
                .readings()
                .map(|(reading, positions)| AmbiguousReadingRecord {
                    key: reading.key().cloned(),
                    positions: positions.iter().copied().collect(),
                })
                .collect();
            readings.sort_by(|a, b| a.key.cmp(&b.key));
            UnresolvableRecord {
                word: word.to_owned(),
                positions: entry.positions().iter().copied().collect(),
                readings,
            }
        })
        .collect();
    records.sort_by(|a, b| a.word.cmp(&b.word));
    UnresolvablePartition::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::PartitionSizes;
    use crate::entry::Entry;
    use accent_protocol::{GrammaticalKey, MorphFlags, PartOfSpeech};

    fn key(lemma: &str) -> GrammaticalKey {
        GrammaticalKey::new(lemma, PartOfSpeech::Verb, MorphFlags::THIRD_PERSON).unwrap()
    }

    fn sample() -> AccentDictionary {
        let mut dict = AccentDictionary::new();
        dict.record_plain("окно", StressPosition(1));
        dict.record_plain("замок", StressPosition(0));
        dict.record_tagged("замок", key("замкнуть"), StressPosition(1));
        dict.record_tagged("стоит", key("стоять"), StressPosition(1));
        dict.record_tagged("стоит", key("стоить"), StressPosition(0));
        dict.record_tagged("мука", key("мучить"), StressPosition(0));
        dict.record_tagged("мука", key("мучить"), StressPosition(1));
        dict
    }

    #[test]
    fn test_missing_directory_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path().join("absent"));
        let dict = store.load().unwrap();
        assert!(dict.is_empty());
        assert!(!dict.is_dirty());
    }

    #[test]
    fn test_save_then_load_preserves_partitions() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let mut dict = sample();

        let delta = store.save(&mut dict).unwrap();
        assert_eq!(delta, SizeDelta { accents: 1, homographs: 2, unresolvable: 1 });
        assert!(!dict.is_dirty());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.sizes(), dict.sizes());
        for word in ["окно", "замок", "стоит", "мука"] {
            assert_eq!(loaded.entry(word), dict.entry(word), "entry for {word}");
        }
        assert!(matches!(loaded.entry("замок"), Some(Entry::Homograph(_))));
        assert_eq!(loaded.delta(), SizeDelta::default());
    }

    #[test]
    fn test_save_is_deterministic() {
        let mut forward = sample();
        let mut backward = AccentDictionary::new();
        backward.record_tagged("мука", key("мучить"), StressPosition(1));
        backward.record_tagged("мука", key("мучить"), StressPosition(0));
        backward.record_tagged("стоит", key("стоить"), StressPosition(0));
        backward.record_tagged("стоит", key("стоять"), StressPosition(1));
        backward.record_plain("замок", StressPosition(0));
        backward.record_tagged("замок", key("замкнуть"), StressPosition(1));
        backward.record_plain("окно", StressPosition(1));

        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        DictionaryStore::new(first.path()).save(&mut forward).unwrap();
        DictionaryStore::new(second.path()).save(&mut backward).unwrap();

        for file in [ACCENTS_FILE, HOMOGRAPHS_FILE, UNRESOLVABLE_FILE] {
            let a = fs::read(first.path().join(file)).unwrap();
            let b = fs::read(second.path().join(file)).unwrap();
            assert_eq!(a, b, "{file} differs");
        }
    }

    #[test]
    fn test_delta_is_relative_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let mut dict = sample();
        store.save(&mut dict).unwrap();

        let mut dict = store.load().unwrap();
        assert_eq!(store.save_if_changed(&mut dict).unwrap(), None);

        assert_eq!(dict.compact(), 0);
        dict.record_tagged("окно", key("окно"), StressPosition(0));
        let delta = store.save_if_changed(&mut dict).unwrap();
        assert_eq!(delta, Some(SizeDelta { accents: -1, homographs: 1, unresolvable: 0 }));
    }

    #[test]
    fn test_corrupt_archive_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(ACCENTS_FILE), b"not an archive").unwrap();
        let err = DictionaryStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }), "{err}");
    }

    #[test]
    fn test_duplicate_word_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let accents = AccentPartition::new(vec![AccentRecord {
            word: "замок".into(),
            position: StressPosition(0),
        }]);
        let homographs = HomographPartition::new(vec![HomographRecord {
            word: "замок".into(),
            positions: vec![StressPosition(1)],
            readings: vec![ReadingRecord { key: Some(key("замок")), position: StressPosition(1) }],
        }]);
        let accent_path = dir.path().join(ACCENTS_FILE);
        let homograph_path = dir.path().join(HOMOGRAPHS_FILE);
        let accent_bytes = encode_partition!(&accents, accent_path).unwrap();
        let homograph_bytes = encode_partition!(&homographs, homograph_path).unwrap();
        write_atomic(&accent_path, &accent_bytes).unwrap();
        write_atomic(&homograph_path, &homograph_bytes).unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref word, .. } if word == "замок"), "{err}");
    }

    #[test]
    fn test_trivial_word_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let accents = AccentPartition::new(vec![AccentRecord {
            word: "дом".into(),
            position: StressPosition(0),
        }]);
        let path = dir.path().join(ACCENTS_FILE);
        write_atomic(&path, &encode_partition!(&accents, path).unwrap()).unwrap();

        let err = DictionaryStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref word, .. } if word == "дом"), "{err}");
    }

    #[test]
    fn test_missing_partition_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DictionaryStore::new(dir.path());
        let mut dict = sample();
        store.save(&mut dict).unwrap();
        fs::remove_file(dir.path().join(HOMOGRAPHS_FILE)).unwrap();

        let mut loaded = store.load().unwrap();
        assert_eq!(loaded.sizes(), PartitionSizes { accents: 1, homographs: 0, unresolvable: 1 });
        assert_eq!(loaded.delta(), SizeDelta::default());
        assert!(!loaded.is_dirty());
        assert_eq!(loaded.entry("окно"), Some(Entry::Resolved(StressPosition(1))));
        assert!(matches!(loaded.entry("мука"), Some(Entry::Unresolvable(_))));
        assert!(loaded.entry("стоит").is_none());

        // The absent file is written back on the next save.
        store.save(&mut loaded).unwrap();
        assert!(dir.path().join(HOMOGRAPHS_FILE).exists());
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut partition = AccentPartition::new(vec![]);
        partition.version = FORMAT_VERSION + 1;
        let path = dir.path().join(ACCENTS_FILE);
        write_atomic(&path, &encode_partition!(&partition, path).unwrap()).unwrap();

        let err = DictionaryStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, StoreError::Version { found, .. } if found == FORMAT_VERSION + 1));
    }
}
