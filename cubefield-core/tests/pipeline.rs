use cubefield_core::source::{FieldSource, ImageSource};
use cubefield_core::stl::parse_stl;
use cubefield_core::{
    chunk, mesh_field, CubeParams, Field, OutputConfig, Pipeline, PipelineConfig, StlFormat,
    TilingConfig,
};
use image::{Rgb, RgbImage};

#[test]
fn constant_field_in_two_by_two_tiles() {
    let field = Field::constant(4, 4, 0.5).unwrap();
    let params = CubeParams {
        cube_size: 10.0,
        inner_wall_scale: 0.5,
        height_scale: 10.0,
        ..Default::default()
    };
    let grid = mesh_field(&field, &params).unwrap();
    let tiles = chunk(&grid, &TilingConfig::new(2, 2)).unwrap();

    assert_eq!(tiles.len(), 4);
    for tile in &tiles {
        assert_eq!(tile.cells, 4);
        assert_eq!(tile.mesh.len(), 192);
        let bounds = tile.mesh.bounds().unwrap();
        assert_eq!(bounds.extent().x, 20.0);
        assert_eq!(bounds.extent().z, 5.0);
    }
}

#[test]
fn image_to_stl_files() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("gradient.png");

    // 6 columns x 4 rows, brightness rising left to right
    let img = RgbImage::from_fn(6, 4, |x, _| {
        let v = (x * 40) as u8;
        Rgb([v, v, v])
    });
    img.save(&image_path).unwrap();

    let config = PipelineConfig {
        source: FieldSource::Image(ImageSource::new(&image_path)),
        tiling: TilingConfig::new(2, 2),
        output: OutputConfig {
            dir: Some(dir.path().join("tiles")),
            base: Some("relief".to_string()),
            format: StlFormat::Binary,
        },
        ..Default::default()
    };

    let paths = Pipeline::new(config).unwrap().run().unwrap();
    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "relief-0-0.stl",
            "relief-1-0.stl",
            "relief-2-0.stl",
            "relief-0-1.stl",
            "relief-1-1.stl",
            "relief-2-1.stl",
        ]
    );

    for path in &paths {
        let mesh = parse_stl(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(mesh.len(), 4 * 48);
    }
}

#[test]
fn image_default_base_follows_path() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("stripes.png");
    RgbImage::from_fn(3, 2, |x, y| {
        let v = ((x + y) * 60) as u8;
        Rgb([v, 255 - v, v / 2])
    })
    .save(&image_path)
    .unwrap();

    let mut config = PipelineConfig::image_preset(&image_path);
    if let FieldSource::Image(source) = &mut config.source {
        source.resize_target = None;
    }
    config.output.format = StlFormat::Ascii;
    let paths = Pipeline::new(config).unwrap().run().unwrap();

    assert_eq!(paths, [dir.path().join("stripes-0-0.stl")]);
    let text = std::fs::read_to_string(&paths[0]).unwrap();
    assert!(text.starts_with("solid"));
}

#[test]
fn window_noise_preset_tiles() {
    let mut config = PipelineConfig::window_noise_preset();
    if let FieldSource::WindowNoise(source) = &mut config.source {
        source.seed = Some(3);
    }
    let tiles = Pipeline::new(config).unwrap().tiles().unwrap();

    // 24 rows in tiles of 8, 36 columns in tiles of 12
    assert_eq!(tiles.len(), 9);
    assert!(tiles.iter().all(|t| t.cells == 96));
    assert!(tiles.iter().all(|t| t.mesh.len() == 96 * 48));
}

#[test]
fn missing_image_is_an_error() {
    let config = PipelineConfig::image_preset("/nonexistent/cubefield.png");
    let pipeline = Pipeline::new(config).unwrap();
    assert!(pipeline.tiles().is_err());
}
