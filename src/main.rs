//! glyphgrid - bake glyph grid atlases from the command line
//!
//! Builds the character quad mesh, waits for the configured font,
//! bakes the atlas onto the mesh's grid and writes it as PNG.

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;

use glyphgrid::config::{self, Config};
use glyphgrid::font::{loader, FontBook, FontLoader, GlyphAtlasTextureBaker};
use glyphgrid::scene::Viewport;
use glyphgrid::visual::FloatingChars;

/// Print help message
fn print_help() {
    println!(
        r#"glyphgrid {} - glyph grid mesh and texture atlas baker

USAGE:
    glyphgrid [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --init-config           Generate config file with default settings
    -f, --force             Overwrite config file without confirmation
    --text <TEXT>           Characters to bake (overrides config)
    --family <NAME>         Font family (overrides config)
    --font <PATH>           Font file for the family (overrides search)
    --cols <N>              Atlas cells per row
    --cell <PX>             Atlas cell size in pixels
    -o, --out <PATH>        Output PNG path (default: timestamped file in output.atlas_dir)
    --viewport <WxH>        Viewport used for the camera summary (default: 1280x720)
    --dump-mesh             Print mesh vertices and indices

ENVIRONMENT:
    GLYPHGRID_CONFIG        Config file path
    GLYPHGRID_FONT          Fallback font file
    RUST_LOG                Log filter (default: warn)

EXAMPLES:
    glyphgrid --text "HELLO" --cols 5
    glyphgrid --text "ABC" --cols 2 --cell 64 --out atlas.png
    glyphgrid --init-config

CONFIG FILE:
    ~/.config/glyphgrid/config.toml
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Value following `name` (e.g. `--text HELLO`)
fn arg_value<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_arg<T: std::str::FromStr>(args: &[String], names: &[&str]) -> Result<Option<T>> {
    match arg_value(args, names) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid value for {}: {}", names[0], v)),
        None => Ok(None),
    }
}

/// Parse "WxH"
fn parse_viewport(s: &str) -> Result<Viewport> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("Viewport must be WxH: {}", s))?;
    let width = w.trim().parse().with_context(|| format!("Invalid width: {}", w))?;
    let height = h.trim().parse().with_context(|| format!("Invalid height: {}", h))?;
    Ok(Viewport::new(width, height, 1.0))
}

/// --init-config
fn init_config(force: bool) -> Result<()> {
    let path = config::default_config_path()
        .ok_or_else(|| anyhow!("Config directory not found"))?;

    if path.exists() && !force {
        println!("Config file already exists: {}", path.display());
        print!("Overwrite? [y/N]: ");
        std::io::Write::flush(&mut std::io::stdout())?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input != "y" && input != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }

    Config::write_template(&path)?;
    println!("Config file generated:");
    println!("  Path: {}", path.display());
    Ok(())
}

/// Apply command line overrides to the loaded config
fn apply_overrides(cfg: &mut Config, args: &[String]) -> Result<()> {
    if let Some(text) = arg_value(args, &["--text"]) {
        cfg.text.content = text.to_string();
    }
    if let Some(family) = arg_value(args, &["--family"]) {
        cfg.text.family = family.to_string();
    }
    if let Some(font) = arg_value(args, &["--font"]) {
        cfg.text.font_path = font.to_string();
    }
    if let Some(cols) = parse_arg(args, &["--cols"])? {
        cfg.grid.grid_cols = cols;
    }
    if let Some(cell) = parse_arg(args, &["--cell"])? {
        cfg.grid.cell_size = cell;
    }

    // Every baked character needs a quad
    let text_len = cfg.text.content.chars().count() as u32;
    if text_len > cfg.grid.num_chars {
        debug!(
            "Growing quad count {} -> {} to fit text",
            cfg.grid.num_chars, text_len
        );
        cfg.grid.num_chars = text_len;
    }
    Ok(())
}

/// Wait for the configured family and a fallback, then register them
fn load_fonts(cfg: &Config) -> Result<FontBook> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let fonts = rt.block_on(FontLoader::load_all(vec![cfg.text.font_request()]))?;

    let mut book = FontBook::new();
    let added = loader::register(&mut book, &fonts);
    info!("Fonts ready: {} of {} families", added, fonts.len());

    if !book.contains(&cfg.text.family) {
        if let Some((name, data)) = loader::load_fallback_font() {
            if let Err(e) = book.set_fallback(&name, &data) {
                warn!("{}", e);
            }
        }
    }
    Ok(book)
}

fn print_mesh(chars: &FloatingChars) {
    let mesh = &chars.geometry;
    println!(
        "mesh: {} quads, {} vertices, {} triangles",
        mesh.slot_count(),
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    for (i, v) in mesh.vertices.iter().enumerate() {
        println!(
            "  v{:<4} pos=({:8.2}, {:8.2}, {:5.2}) uv=({:.4}, {:.4})",
            i, v.position[0], v.position[1], v.position[2], v.uv[0], v.uv[1]
        );
    }
    for (i, tri) in mesh.indices.chunks(3).enumerate() {
        println!("  t{:<4} {:?}", i, tri);
    }
}

fn run(cfg: &Config, args: &[String]) -> Result<()> {
    let mut chars = FloatingChars::new(
        cfg.grid.num_chars,
        cfg.grid.char_width,
        cfg.grid.grid_cols,
        cfg.grid.cell_size,
    )?;
    chars.material = cfg.appearance.material();
    chars.geometry = chars.geometry.centered();

    let viewport = match arg_value(args, &["--viewport"]) {
        Some(s) => parse_viewport(s)?,
        None => Viewport::new(1280, 720, 1.0),
    };
    let mut camera = cfg.camera.camera();
    camera.handle_resize(&viewport);
    info!(
        "Camera: fov={} aspect={:.3} distance={}",
        camera.fov_deg, camera.aspect, camera.position[2]
    );

    let book = load_fonts(cfg)?;
    let baker = GlyphAtlasTextureBaker::new(book).with_fill(cfg.appearance.glyph_rgba());

    let texture = chars.create_text_texture(&baker, &cfg.text.content, &cfg.text.family)?;
    let out = match arg_value(args, &["--out", "-o"]) {
        Some(p) => PathBuf::from(p),
        None => cfg.output.atlas_path(),
    };
    texture.save_png(&out)?;

    println!(
        "Atlas: {}x{} ({} chars, {} cols) -> {}",
        texture.width,
        texture.height,
        cfg.text.content.chars().count(),
        cfg.grid.grid_cols,
        out.display()
    );
    if texture.is_blank() && !cfg.text.content.trim().is_empty() {
        eprintln!("Warning: atlas is blank (no usable font). Set GLYPHGRID_FONT or --font.");
    }

    if args.iter().any(|a| a == "--dump-mesh") {
        print_mesh(&chars);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Check command line arguments
    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("glyphgrid {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        return init_config(force);
    }

    let mut cfg = Config::load();
    apply_overrides(&mut cfg, &args)?;
    run(&cfg, &args)
}
