use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

/// Every image the renderer needs. All of them must load for startup to
/// succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Dead,
    Alive,
    Highlighted,
    Play,
    Pause,
    Slower,
    Faster,
    Frame,
}

impl AssetKind {
    pub const ALL: [AssetKind; 8] = [
        AssetKind::Dead,
        AssetKind::Alive,
        AssetKind::Highlighted,
        AssetKind::Play,
        AssetKind::Pause,
        AssetKind::Slower,
        AssetKind::Faster,
        AssetKind::Frame,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            AssetKind::Dead => "tile-white.png",
            AssetKind::Alive => "tile-green.png",
            AssetKind::Highlighted => "tile-blue.png",
            AssetKind::Play => "play-icon.png",
            AssetKind::Pause => "pause-icon.png",
            AssetKind::Slower => "slower-icon.png",
            AssetKind::Faster => "faster-icon.png",
            AssetKind::Frame => "button-frame.png",
        }
    }
}

#[derive(Debug)]
pub struct AssetError {
    pub kind: AssetKind,
    pub path: PathBuf,
    pub source: image::ImageError,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot load {:?} image from {}",
            self.kind,
            self.path.display()
        )
    }
}

impl Error for AssetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Decoded images at their original size.
#[derive(Clone, Debug)]
pub struct Assets {
    images: [RgbaImage; AssetKind::ALL.len()],
}

impl Assets {
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        let mut images: [RgbaImage; AssetKind::ALL.len()] = Default::default();
        for (image, kind) in images.iter_mut().zip(AssetKind::ALL) {
            *image = Self::load_image(dir, kind)?;
        }
        Ok(Self::from_images(images))
    }

    fn load_image(dir: &Path, kind: AssetKind) -> Result<RgbaImage, AssetError> {
        let path = dir.join(kind.file_name());
        match image::open(&path) {
            Ok(image) => Ok(image.to_rgba8()),
            Err(source) => Err(AssetError { kind, path, source }),
        }
    }

    /// Images in [`AssetKind::ALL`] order.
    pub fn from_images(images: [RgbaImage; AssetKind::ALL.len()]) -> Self {
        Self { images }
    }

    pub fn get(&self, kind: AssetKind) -> &RgbaImage {
        &self.images[kind as usize]
    }
}

/// Images scaled to the sizes they are drawn at.
#[derive(Clone, Debug)]
pub struct Sprites {
    pub dead: RgbaImage,
    pub alive: RgbaImage,
    pub highlighted: RgbaImage,
    pub frame: RgbaImage,
    pub play: RgbaImage,
    pub pause: RgbaImage,
    pub slower: RgbaImage,
    pub faster: RgbaImage,
}

impl Sprites {
    /// Tiles become `cell_size` squares, the frame fills a button, and icons
    /// take half of each button dimension.
    pub fn prepare(assets: &Assets, cell_size: u32, button_width: u32, button_height: u32) -> Self {
        let tile = |kind| scale(assets.get(kind), cell_size, cell_size);
        let icon = |kind| scale(assets.get(kind), button_width / 2, button_height / 2);
        Self {
            dead: tile(AssetKind::Dead),
            alive: tile(AssetKind::Alive),
            highlighted: tile(AssetKind::Highlighted),
            frame: scale(assets.get(AssetKind::Frame), button_width, button_height),
            play: icon(AssetKind::Play),
            pause: icon(AssetKind::Pause),
            slower: icon(AssetKind::Slower),
            faster: icon(AssetKind::Faster),
        }
    }
}

fn scale(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (width, height) = (width.max(1), height.max(1));
    if image.dimensions() == (width, height) {
        image.clone()
    } else {
        imageops::resize(image, width, height, FilterType::Nearest)
    }
}
