mod common;

use albumdo_core::{CoverKind, PhotoLibrary, Size};
use common::{create_png, Sandbox};

#[test]
fn test_flat_directory_yields_single_cover() {
    let sandbox = Sandbox::new();
    let photos = sandbox.photos();
    for i in 0..5 {
        create_png(&photos.join(format!("{}.png", i)), 300, 200);
    }

    let library = PhotoLibrary::new(sandbox.config()).unwrap();
    let tiles = library.list_directory_tiles(&photos).unwrap();

    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].directory, photos);
    assert_eq!(tiles[0].image_count, 5);
    assert_eq!(tiles[0].cover.kind, CoverKind::Single);
    assert_eq!(tiles[0].cover.size(), library.config().tile_size);
}

#[test]
fn test_root_tile_counts_everything_and_subfolders_their_own() {
    let sandbox = Sandbox::new();
    let photos = sandbox.photos();
    create_png(&photos.join("root.png"), 50, 50);
    create_png(&photos.join("2023/a.png"), 50, 50);
    create_png(&photos.join("2023/b.png"), 50, 50);
    create_png(&photos.join("2023/summer/c.png"), 50, 50);

    let config = albumdo_core::Config {
        tile_size: Size::new(64, 64),
        ..sandbox.config()
    };
    let library = PhotoLibrary::new(config).unwrap();
    let tiles = library.list_directory_tiles(&photos).unwrap();

    let counts: Vec<(String, usize, CoverKind)> = tiles
        .iter()
        .map(|t| {
            (
                t.directory.strip_prefix(&photos).unwrap().display().to_string(),
                t.image_count,
                t.cover.kind,
            )
        })
        .collect();
    assert_eq!(
        counts,
        vec![
            ("".to_string(), 4, CoverKind::Grid),
            ("2023".to_string(), 2, CoverKind::Grid),
            ("2023/summer".to_string(), 1, CoverKind::Single),
        ]
    );
    for tile in &tiles {
        assert_eq!(tile.cover.size(), Size::new(64, 64));
    }
}

#[cfg(unix)]
#[test]
fn test_rating_tiles_group_by_bucket() {
    let sandbox = Sandbox::new();
    let photos = sandbox.photos();
    let a = create_png(&photos.join("a.png"), 40, 40);
    let b = create_png(&photos.join("b.png"), 40, 40);
    let c = create_png(&photos.join("c.png"), 40, 40);

    let mut library = PhotoLibrary::new(sandbox.config()).unwrap();
    library.rate(&a, 3).unwrap();
    library.rate(&b, 3).unwrap();
    library.rate(&c, 1).unwrap();

    let tiles = library.list_rating_tiles().unwrap();
    let buckets: Vec<(String, usize)> = tiles
        .iter()
        .map(|t| {
            (
                t.directory.file_name().unwrap().to_string_lossy().into_owned(),
                t.image_count,
            )
        })
        .collect();
    assert_eq!(
        buckets,
        vec![
            ("scores".to_string(), 3),
            ("1".to_string(), 1),
            ("3".to_string(), 2)
        ]
    );
}

#[test]
fn test_root_of_subfolders_has_all_images_tile() {
    let sandbox = Sandbox::new();
    let photos = sandbox.photos();
    create_png(&photos.join("spring/a.png"), 50, 50);
    create_png(&photos.join("autumn/b.png"), 50, 50);
    create_png(&photos.join("autumn/c.png"), 50, 50);

    let library = PhotoLibrary::new(sandbox.config()).unwrap();
    let tiles = library.list_directory_tiles(&photos).unwrap();

    assert_eq!(tiles.len(), 3);
    assert_eq!(tiles[0].directory, photos);
    assert_eq!(tiles[0].image_count, 3);
    assert_eq!(tiles[0].cover.kind, CoverKind::Grid);
    assert_eq!(tiles[0].label(), format!("{}/\n3", last_two(&photos)));
}

fn last_two(path: &std::path::Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts[parts.len() - 2..].join("/")
}
