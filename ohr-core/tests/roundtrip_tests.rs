//! Round-trip tests for ohr-core
//!
//! These tests verify that metadata survives encoding to XML and decoding
//! back, both for single files and for whole folder trees.
//!
//! ## Test Strategy
//!
//! 1. **Property tests**: arbitrary files and trees round-trip through the
//!    element tree and through document text
//! 2. **Scenario tests**: fixed catalogs with known aggregates
//! 3. **Rejection tests**: malformed documents fail as a whole

use ohr_core::catalog::{load_catalog, save_catalog, DEFAULT_MAX_DEPTH};
use ohr_core::{
    read_catalog, read_catalog_json, read_catalog_json_with, read_catalog_with, write_catalog,
    write_catalog_json, BookFile, BookFolder, BookInfo, DecodeOptions, Element, FileType,
    MetadataError, OhrError, SHA512_DIGEST_LEN,
};
use proptest::prelude::*;
use std::collections::BTreeMap;
use url::Url;

// =============================================================================
// Strategies
// =============================================================================

/// Display strings, including characters that need escaping in XML
fn display_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 <>&'\"\u{5d0}-\u{5ea}._-]{0,20}"
}

fn url_strategy() -> impl Strategy<Value = Url> {
    (
        prop_oneof![
            Just("https://example.com"),
            Just("http://mirror.example.org:8080"),
            Just("file://"),
        ],
        "(/[a-z0-9]{1,8}){1,4}",
    )
        .prop_map(|(base, path)| Url::parse(&format!("{}{}", base, path)).unwrap())
}

fn file_parts() -> impl Strategy<Value = (Url, Vec<u8>, u64)> {
    (
        url_strategy(),
        prop::collection::vec(any::<u8>(), 0..=96),
        any::<u64>(),
    )
}

fn file_strategy() -> impl Strategy<Value = BookFile> {
    (display_text(), file_parts())
        .prop_map(|(file_type, (url, hash, size))| BookFile::new(file_type, url, hash, size))
}

fn book_strategy() -> impl Strategy<Value = BookInfo> {
    (
        display_text(),
        display_text(),
        display_text(),
        // Keys are unique, as a book holds at most one file per type
        prop::collection::btree_map(display_text(), file_parts(), 0..4),
    )
        .prop_map(|(name, author, icon, files): (_, _, _, BTreeMap<String, _>)| {
            let files = files
                .into_iter()
                .map(|(file_type, (url, hash, size))| BookFile::new(file_type, url, hash, size));
            BookInfo::new(name, author, icon, files).unwrap()
        })
}

fn folder_strategy(max_depth: usize) -> BoxedStrategy<BookFolder> {
    let books = prop::collection::vec(book_strategy(), 0..3);
    if max_depth == 0 {
        (display_text(), books)
            .prop_map(|(name, books)| BookFolder::new(name, books, Vec::new()))
            .boxed()
    } else {
        (
            display_text(),
            books,
            prop::collection::vec(folder_strategy(max_depth - 1), 0..3),
        )
            .prop_map(|(name, books, subfolders)| BookFolder::new(name, books, subfolders))
            .boxed()
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn text_file(size: u64) -> BookFile {
    BookFile::new(
        FileType::Text,
        Url::parse("https://x/a.txt").unwrap(),
        vec![0u8; SHA512_DIGEST_LEN],
        size,
    )
}

/// A folder chain `depth` levels deep with one book at every level
fn chain(depth: usize) -> BookFolder {
    let mut folder: Option<BookFolder> = None;
    for level in (1..=depth).rev() {
        let files = vec![text_file(level as u64)];
        let book = BookInfo::new(format!("Book {}", level), "X", "icon1", files).unwrap();
        folder = Some(BookFolder::new(
            format!("Level {}", level),
            vec![book],
            folder.into_iter().collect::<Vec<_>>(),
        ));
    }
    folder.expect("depth must be at least 1")
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #[test]
    fn book_file_round_trips(file in file_strategy()) {
        let decoded = BookFile::from_xml(&file.to_xml()).unwrap();
        prop_assert_eq!(decoded, file);
    }

    #[test]
    fn book_file_round_trips_through_text(file in file_strategy()) {
        let text = file.to_xml().to_xml_string().unwrap();
        let decoded = BookFile::from_xml(&Element::parse(&text).unwrap()).unwrap();
        prop_assert_eq!(decoded, file);
    }

    #[test]
    fn folder_tree_round_trips(tree in folder_strategy(3)) {
        let xml = write_catalog(&tree).unwrap();
        let decoded = read_catalog(&xml).unwrap();
        prop_assert_eq!(decoded, tree);
    }

    #[test]
    fn folder_tree_round_trips_through_json(tree in folder_strategy(2)) {
        let json = write_catalog_json(&tree).unwrap();
        let decoded = read_catalog_json(&json).unwrap();
        prop_assert_eq!(decoded, tree);
    }

    #[test]
    fn book_size_is_sum_of_file_sizes(sizes in prop::collection::vec(0u64..1_000_000, 0..8)) {
        let files = sizes.iter().enumerate().map(|(i, &size)| {
            let url = Url::parse("https://x/f").unwrap();
            BookFile::new(format!("Type{}", i), url, Vec::new(), size)
        });
        let book = BookInfo::new("Sefer", "X", "icon1", files).unwrap();
        prop_assert_eq!(book.size(), sizes.iter().sum::<u64>());
    }
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[test]
fn test_nested_scenario() {
    let book = BookInfo::new("Sefer", "X", "icon1", vec![text_file(10)]).unwrap();
    let root = BookFolder::new(
        "Root",
        Vec::new(),
        vec![BookFolder::new("Child", vec![book], Vec::new())],
    );

    let decoded = read_catalog(&write_catalog(&root).unwrap()).unwrap();
    assert_eq!(decoded, root);
    assert_eq!(decoded.subfolders()[0].books()[0].size(), 10);
    assert_eq!(decoded.subfolders()[0].books()[0].name(), "Sefer");
}

#[test]
fn test_zero_hash_encoding() {
    let xml = text_file(10).to_xml();
    let hash = xml.child("Hash").unwrap().text();
    assert_eq!(hash, format!("{}==", "A".repeat(86)));

    let decoded = BookFile::from_xml(&xml).unwrap();
    assert_eq!(decoded.hash(), &[0u8; SHA512_DIGEST_LEN][..]);
    assert!(decoded.has_digest_length());
}

#[test]
fn test_fifty_levels_round_trip() {
    let tree = chain(50);
    assert_eq!(tree.depth(), 50);
    assert_eq!(tree.book_count(), 50);
    assert_eq!(tree.total_size(), (1..=50).sum::<u64>());

    let decoded = read_catalog(&write_catalog(&tree).unwrap()).unwrap();
    assert_eq!(decoded, tree);
}

#[test]
fn test_depth_beyond_default_limit() {
    let tree = chain(DEFAULT_MAX_DEPTH + 1);
    let xml = write_catalog(&tree).unwrap();

    let err = read_catalog(&xml).unwrap_err();
    assert!(matches!(
        err,
        OhrError::Metadata(MetadataError::DepthExceeded { limit: DEFAULT_MAX_DEPTH })
    ));

    let relaxed = DecodeOptions::default().with_max_depth(DEFAULT_MAX_DEPTH + 1);
    assert_eq!(read_catalog_with(&xml, &relaxed).unwrap(), tree);
}

#[test]
fn test_hundred_levels_round_trip_through_both_forms() {
    let tree = chain(100);

    let from_xml = read_catalog(&write_catalog(&tree).unwrap()).unwrap();
    assert_eq!(from_xml, tree);

    let json = write_catalog_json(&from_xml).unwrap();
    let from_json = read_catalog_json(&json).unwrap();
    assert_eq!(from_json, tree);
    assert_eq!(write_catalog(&from_json).unwrap(), write_catalog(&tree).unwrap());
}

#[test]
fn test_json_depth_beyond_default_limit() {
    let tree = chain(DEFAULT_MAX_DEPTH + 1);
    let json = write_catalog_json(&tree).unwrap();

    let err = read_catalog_json(&json).unwrap_err();
    assert!(matches!(
        err,
        OhrError::Metadata(MetadataError::DepthExceeded { limit: DEFAULT_MAX_DEPTH })
    ));

    let relaxed = DecodeOptions::default().with_max_depth(DEFAULT_MAX_DEPTH + 1);
    assert_eq!(read_catalog_json_with(&json, &relaxed).unwrap(), tree);

    let strict = DecodeOptions::default().with_max_depth(10);
    let err = read_catalog_json_with(&write_catalog_json(&chain(11)).unwrap(), &strict);
    assert!(matches!(
        err,
        Err(OhrError::Metadata(MetadataError::DepthExceeded { limit: 10 }))
    ));
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.xml");
    let tree = chain(3);

    save_catalog(&path, &tree).unwrap();
    assert_eq!(load_catalog(&path, &DecodeOptions::default()).unwrap(), tree);

    let missing = load_catalog(dir.path().join("missing.xml"), &DecodeOptions::default());
    assert!(matches!(missing, Err(OhrError::Io(_))));
}

// =============================================================================
// Rejection Tests
// =============================================================================

#[test]
fn test_malformed_url_deep_in_tree() {
    let xml = r#"<Folder name="Root">
  <Books/>
  <Subfolders>
    <Folder name="Child">
      <Books>
        <Book name="Sefer" author="X">
          <Icon>icon1</Icon>
          <Files>
            <BookFile type="Text" size="10">
              <Url>not a url</Url>
              <Hash>AAAA</Hash>
            </BookFile>
          </Files>
        </Book>
      </Books>
      <Subfolders/>
    </Folder>
  </Subfolders>
</Folder>"#;

    let err = read_catalog(xml).unwrap_err();
    assert!(matches!(
        err,
        OhrError::Metadata(MetadataError::MalformedUri { ref value, .. }) if value == "not a url"
    ));
}

#[test]
fn test_book_root_passed_to_folder_decoder() {
    let book = BookInfo::new("Sefer", "X", "icon1", vec![text_file(1)]).unwrap();
    let err = BookFolder::from_xml(&book.to_xml()).unwrap_err();
    assert!(matches!(err, MetadataError::UnexpectedTag { expected: "Folder", .. }));
}

#[test]
fn test_duplicate_file_types_in_document() {
    let xml = r#"<Folder name="Root">
  <Books>
    <Book name="Sefer" author="X">
      <Icon>icon1</Icon>
      <Files>
        <BookFile type="Index" size="1"><Url>https://x/a</Url><Hash>AAAA</Hash></BookFile>
        <BookFile type="Index" size="2"><Url>https://x/b</Url><Hash>AAAA</Hash></BookFile>
      </Files>
    </Book>
  </Books>
  <Subfolders/>
</Folder>"#;

    let err = read_catalog(xml).unwrap_err();
    assert!(matches!(
        err,
        OhrError::Metadata(MetadataError::DuplicateKey(ref key)) if key == "Index"
    ));
}

#[test]
fn test_legacy_names_from_document() {
    let xml = r#"<Folder name="Root">
  <Books>
    <Book type="Legacy" name="Modern" author="X"><Icon>i</Icon><Files/></Book>
  </Books>
  <Subfolders/>
</Folder>"#;

    let modern = read_catalog(xml).unwrap();
    assert_eq!(modern.books()[0].name(), "Modern");

    let legacy = read_catalog_with(xml, &DecodeOptions::default().with_legacy_name_attribute(true))
        .unwrap();
    assert_eq!(legacy.books()[0].name(), "Legacy");
}
