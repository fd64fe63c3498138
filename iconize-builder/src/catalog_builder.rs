//! Asset catalog generation
//!
//! A [`CatalogBuilder`] resolves the variants of the selected platforms,
//! renders every variant from the matching source image and writes the images
//! together with a `Contents.json` into one directory per catalog:
//!
//! ```text
//! <root>/<assets_dir>/App Icons/<Platform | Combined>/<name>.appiconset/
//! <root>/<assets_dir>/Image Sets/<name>.imageset/
//! <root>/<assets_dir>/Launch Images/<name>.launchimage/
//! <root>/<assets_dir>/iMessage Icons/<name>.stickersiconset/
//! ```
//!
//! Rendering is best effort: a variant that fails is reported and left out of
//! the manifest while the others are still written, and a directory that
//! cannot be created or populated does not stop the remaining ones. The export
//! only fails as a whole when resources cannot be loaded or when no image
//! could be produced.

use crate::png_codec::{self, AlphaPolicy};
use crate::progress_tracker::ProgressTracker;
use crate::{transform, Error, ExportConfig, Result};
use iconize_core::{
    AspectMode, AssetKind, AssetSize, AssetSpecLoader, ImageOrientation, Manifest, Platform,
    Variant, MANIFEST_FILE_NAME,
};
use image::RgbaImage;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Source images keyed by the orientation they are meant for
#[derive(Debug, Clone, Default)]
pub struct SourceImages {
    images: BTreeMap<ImageOrientation, RgbaImage>,
}

impl SourceImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single orientation-independent source image
    pub fn single(image: RgbaImage) -> Self {
        Self::new().with(ImageOrientation::Unspecified, image)
    }

    pub fn with(mut self, orientation: ImageOrientation, image: RgbaImage) -> Self {
        self.insert(orientation, image);
        self
    }

    pub fn insert(&mut self, orientation: ImageOrientation, image: RgbaImage) -> Option<RgbaImage> {
        self.images.insert(orientation, image)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn orientations(&self) -> Vec<ImageOrientation> {
        self.images.keys().copied().collect()
    }

    /// Source image for a variant of the given orientation.
    ///
    /// Oriented variants fall back to the orientation-independent image;
    /// orientation-independent variants take whichever image there is.
    pub fn image_for(&self, orientation: ImageOrientation) -> Option<&RgbaImage> {
        match orientation {
            ImageOrientation::Unspecified => self
                .images
                .get(&ImageOrientation::Unspecified)
                .or_else(|| self.images.values().next()),
            oriented => self
                .images
                .get(&oriented)
                .or_else(|| self.images.get(&ImageOrientation::Unspecified)),
        }
    }

    /// Orientations to generate launch images for
    fn launch_orientations(&self) -> Vec<ImageOrientation> {
        let oriented: Vec<ImageOrientation> = [ImageOrientation::Portrait, ImageOrientation::Landscape]
            .into_iter()
            .filter(|orientation| self.images.contains_key(orientation))
            .collect();

        if oriented.is_empty() && self.images.contains_key(&ImageOrientation::Unspecified) {
            vec![ImageOrientation::Portrait, ImageOrientation::Landscape]
        } else {
            oriented
        }
    }
}

/// A variant that could not be generated
#[derive(Debug, Clone)]
pub struct VariantFailure {
    pub directory: PathBuf,
    pub filename: String,
    pub reason: String,
}

/// Outcome of one export
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Catalog directories a manifest was written to
    pub directories: Vec<PathBuf>,
    /// Image files written by this export
    pub written: Vec<PathBuf>,
    /// Image files that already existed and were kept
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<VariantFailure>,
}

impl ExportReport {
    /// Number of image files present for the exported catalogs
    pub fn generated(&self) -> usize {
        self.written.len() + self.skipped.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One catalog directory and the variants it will contain
#[derive(Debug, Clone)]
pub struct CatalogDirectory {
    pub path: PathBuf,
    pub variants: Vec<Variant>,
}

struct RenderJob<'a> {
    variant: &'a Variant,
    filename: String,
    path: PathBuf,
}

/// Generates the catalogs of one asset kind
pub struct CatalogBuilder {
    kind: AssetKind,
    config: ExportConfig,
    loader: AssetSpecLoader,
    catalog: Vec<Variant>,
    manifest: Manifest,
}

impl CatalogBuilder {
    /// Creates a builder using the bundled variant resources
    pub fn new(kind: AssetKind, config: ExportConfig) -> Self {
        let manifest = Manifest::new(config.author.clone());
        Self {
            kind,
            config,
            loader: AssetSpecLoader::embedded(),
            catalog: Vec::new(),
            manifest,
        }
    }

    pub fn with_loader(mut self, loader: AssetSpecLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Variants of the directory currently being exported; empty between exports
    pub fn catalog(&self) -> &[Variant] {
        &self.catalog
    }

    /// Manifest of the directory currently being exported; empty between exports
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Resolves the catalog directories of an export without rendering anything
    pub fn plan(
        &self,
        sources: &SourceImages,
        output_root: &Path,
        catalog_name: &str,
    ) -> Result<Vec<CatalogDirectory>> {
        let name = catalog_name.trim();
        if name.is_empty() {
            return Err(iconize_core::Error::MissingName.into());
        }
        if sources.is_empty() {
            return Err(iconize_core::Error::MissingImage(ImageOrientation::Unspecified).into());
        }

        let kind_dir = output_root
            .join(&self.config.assets_dir)
            .join(self.kind.directory_name());
        let set_name = format!("{}.{}", name, self.kind.extension());
        let orientations = if self.kind.is_oriented() {
            sources.launch_orientations()
        } else {
            vec![ImageOrientation::Unspecified]
        };

        if !self.kind.supports_per_platform() {
            let variants = self
                .loader
                .resolve(self.kind, &self.config.platforms, &orientations)?;
            return Ok(vec![CatalogDirectory {
                path: kind_dir.join(&set_name),
                variants,
            }]);
        }

        if self.config.combined {
            let variants = self
                .loader
                .resolve(self.kind, &self.config.platforms, &orientations)?;
            return Ok(vec![CatalogDirectory {
                path: kind_dir.join("Combined").join(&set_name),
                variants,
            }]);
        }

        let selected = &self.config.platforms;
        let has_ios_devices = selected.iter().any(|platform| platform.shares_ios_variants());

        let mut directories: Vec<CatalogDirectory> = Vec::new();
        let mut visited: Vec<Platform> = Vec::new();
        for platform in selected {
            if *platform == Platform::Undefined || visited.contains(platform) {
                continue;
            }
            visited.push(*platform);

            // already part of every iPhone and iPad catalog
            if *platform == Platform::Ios && has_ios_devices {
                continue;
            }

            let variants = self.loader.resolve(self.kind, &[*platform], &orientations)?;
            directories.push(CatalogDirectory {
                path: kind_dir.join(platform.name()).join(&set_name),
                variants,
            });
        }

        if directories.is_empty() {
            return Err(iconize_core::Error::MissingPlatform.into());
        }
        Ok(directories)
    }

    /// Renders and writes every catalog of this export.
    ///
    /// All resources are resolved before the first file is written. Files that
    /// already exist under a variant's file name are kept as they are but still
    /// listed in the manifest.
    pub fn generate(
        &mut self,
        sources: &SourceImages,
        output_root: &Path,
        catalog_name: &str,
    ) -> Result<ExportReport> {
        let directories = self.plan(sources, output_root, catalog_name)?;
        let mut report = ExportReport::default();

        for directory in directories {
            self.catalog = directory.variants;
            if let Err(error) = self.export_directory(&directory.path, sources, &mut report) {
                log::warn!("Failed to export {}: {}", directory.path.display(), error);
                self.fail_directory(&directory.path, &error, &mut report);
            }
            self.catalog.clear();
            self.manifest.clear();
        }

        if report.generated() == 0 && !report.failures.is_empty() {
            return Err(Error::ExportFailed(report.failures));
        }
        Ok(report)
    }

    /// Exports the current catalog into `dir`.
    ///
    /// An error returned here means no file of the directory was written.
    fn export_directory(
        &mut self,
        dir: &Path,
        sources: &SourceImages,
        report: &mut ExportReport,
    ) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        if !self.kind.has_point_size() {
            self.bind_source_sizes(sources)?;
        }

        log::info!(
            "Generating {} {} variants in {}",
            self.catalog.len(),
            self.kind,
            dir.display()
        );

        // The first variant of every file name renders it, the others share the file.
        let mut seen: HashSet<String> = HashSet::new();
        let mut jobs: Vec<RenderJob> = Vec::new();
        for variant in &self.catalog {
            let filename = variant.filename();
            if !seen.insert(filename.clone()) {
                continue;
            }

            let path = dir.join(&filename);
            if path.exists() {
                log::debug!("Keeping existing {}", path.display());
                report.skipped.push(path);
                continue;
            }
            jobs.push(RenderJob {
                variant,
                filename,
                path,
            });
        }

        let aspect_mode = self.config.aspect_mode;
        let tracker = ProgressTracker::new(jobs.len() as u64, "Rendered");
        let results: Vec<Result<()>> = jobs
            .par_iter()
            .map(|job| {
                let result = render_variant(job.variant, sources, aspect_mode, &job.path);
                tracker.increment_and_report(10);
                result
            })
            .collect();

        let mut failed: HashSet<&str> = HashSet::new();
        for (job, result) in jobs.iter().zip(results) {
            match result {
                Ok(()) => report.written.push(job.path.clone()),
                Err(error) => {
                    log::warn!("Failed to generate {}: {}", job.path.display(), error);
                    failed.insert(job.filename.as_str());
                    report.failures.push(VariantFailure {
                        directory: dir.to_path_buf(),
                        filename: job.filename.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        for variant in &self.catalog {
            if !failed.contains(variant.filename().as_str()) {
                self.manifest.record(variant);
            }
        }

        if self.manifest.is_empty() {
            log::warn!("Nothing generated in {}, no manifest written", dir.display());
            return Ok(());
        }
        if let Err(error) = self.manifest.write(dir) {
            log::warn!("Failed to write the manifest in {}: {}", dir.display(), error);
            report.failures.push(VariantFailure {
                directory: dir.to_path_buf(),
                filename: MANIFEST_FILE_NAME.to_string(),
                reason: error.to_string(),
            });
            return Ok(());
        }
        report.directories.push(dir.to_path_buf());
        Ok(())
    }

    /// Reports every file of the current catalog as failed
    fn fail_directory(&self, dir: &Path, error: &Error, report: &mut ExportReport) {
        let mut seen: HashSet<String> = HashSet::new();
        for variant in &self.catalog {
            let filename = variant.filename();
            if seen.insert(filename.clone()) {
                report.failures.push(VariantFailure {
                    directory: dir.to_path_buf(),
                    filename,
                    reason: error.to_string(),
                });
            }
        }
    }

    /// Derives the point size of size-less variants from their source image:
    /// a third of the source, rounded up to whole points. The 3x image is the
    /// source itself.
    fn bind_source_sizes(&mut self, sources: &SourceImages) -> Result<()> {
        for variant in self.catalog.iter_mut() {
            if variant.size.is_some() {
                continue;
            }
            let image = sources
                .image_for(variant.orientation)
                .ok_or(iconize_core::Error::MissingImage(variant.orientation))?;
            let (width, height) = image.dimensions();
            let size = AssetSize::from_points(width.div_ceil(3) as f32, height.div_ceil(3) as f32)?;
            *variant = variant.with_size(size);
        }
        Ok(())
    }
}

fn render_variant(
    variant: &Variant,
    sources: &SourceImages,
    aspect_mode: AspectMode,
    path: &Path,
) -> Result<()> {
    let source = sources
        .image_for(variant.orientation)
        .ok_or(iconize_core::Error::MissingImage(variant.orientation))?;
    let (width, height) = if variant.reproduces_source() {
        source.dimensions()
    } else {
        variant
            .pixel_size()
            .ok_or(Error::RescalingFailed { width: 0, height: 0 })?
    };

    log::debug!(
        "Rendering {} at {}x{} ({})",
        variant.filename(),
        width,
        height,
        aspect_mode
    );
    let resized = transform::resize(source, width, height, aspect_mode)?;

    let alpha = if variant.requires_opaque() {
        AlphaPolicy::Strip
    } else {
        AlphaPolicy::Keep
    };
    png_codec::write_png(&resized, path, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn square(size: u32) -> RgbaImage {
        RgbaImage::from_pixel(size, size, Rgba([20, 40, 60, 255]))
    }

    fn config(platforms: &[Platform], combined: bool) -> ExportConfig {
        ExportConfig {
            platforms: platforms.to_vec(),
            combined,
            ..Default::default()
        }
    }

    #[test]
    fn test_source_selection_by_orientation() {
        let sources = SourceImages::new()
            .with(ImageOrientation::Portrait, square(2))
            .with(ImageOrientation::Landscape, square(3));
        assert_eq!(sources.image_for(ImageOrientation::Landscape).unwrap().width(), 3);
        assert_eq!(sources.image_for(ImageOrientation::Portrait).unwrap().width(), 2);
        assert!(sources.image_for(ImageOrientation::Unspecified).is_some());

        let portrait_only = SourceImages::new().with(ImageOrientation::Portrait, square(2));
        assert!(portrait_only.image_for(ImageOrientation::Landscape).is_none());
        assert_eq!(portrait_only.launch_orientations(), vec![ImageOrientation::Portrait]);

        let single = SourceImages::single(square(4));
        assert_eq!(single.image_for(ImageOrientation::Landscape).unwrap().width(), 4);
        assert_eq!(
            single.launch_orientations(),
            vec![ImageOrientation::Portrait, ImageOrientation::Landscape]
        );
    }

    #[test]
    fn test_plan_per_platform_directories() {
        let builder = CatalogBuilder::new(
            AssetKind::AppIcon,
            config(&[Platform::IPhone, Platform::Mac, Platform::Ios], false),
        );
        let plan = builder
            .plan(&SourceImages::single(square(8)), Path::new("/out"), "AppIcon")
            .unwrap();

        let paths: Vec<&Path> = plan.iter().map(|dir| dir.path.as_path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("/out/Iconize Assets/App Icons/iPhone/AppIcon.appiconset"),
                Path::new("/out/Iconize Assets/App Icons/Mac/AppIcon.appiconset"),
            ]
        );
        // the iPhone catalog carries the shared marketing icon
        assert_eq!(plan[0].variants.len(), 9);
        assert_eq!(plan[1].variants.len(), 10);
    }

    #[test]
    fn test_plan_combined_and_fixed_kinds() {
        let sources = SourceImages::single(square(8));

        let builder = CatalogBuilder::new(
            AssetKind::AppIcon,
            config(&[Platform::IPhone, Platform::IPad], true),
        );
        let plan = builder.plan(&sources, Path::new("/out"), "AppIcon").unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(
            plan[0].path,
            Path::new("/out/Iconize Assets/App Icons/Combined/AppIcon.appiconset")
        );
        assert_eq!(plan[0].variants.len(), 18);

        let builder = CatalogBuilder::new(AssetKind::MessagesIcon, ExportConfig::default());
        let plan = builder.plan(&sources, Path::new("/out"), "Stickers").unwrap();
        assert_eq!(
            plan[0].path,
            Path::new("/out/Iconize Assets/iMessage Icons/Stickers.stickersiconset")
        );

        let builder = CatalogBuilder::new(AssetKind::ImageSet, ExportConfig::default());
        let plan = builder.plan(&sources, Path::new("/out"), "Logo").unwrap();
        assert_eq!(plan[0].path, Path::new("/out/Iconize Assets/Image Sets/Logo.imageset"));
    }

    #[test]
    fn test_plan_input_errors() {
        let sources = SourceImages::single(square(8));
        let builder = CatalogBuilder::new(AssetKind::AppIcon, config(&[Platform::Mac], false));

        assert!(matches!(
            builder.plan(&sources, Path::new("/out"), "  "),
            Err(Error::Core(iconize_core::Error::MissingName))
        ));
        assert!(matches!(
            builder.plan(&SourceImages::new(), Path::new("/out"), "AppIcon"),
            Err(Error::Core(iconize_core::Error::MissingImage(_)))
        ));

        let builder = CatalogBuilder::new(AssetKind::AppIcon, config(&[], false));
        assert!(matches!(
            builder.plan(&sources, Path::new("/out"), "AppIcon"),
            Err(Error::Core(iconize_core::Error::MissingPlatform))
        ));
        let builder = CatalogBuilder::new(AssetKind::LaunchImage, config(&[], true));
        assert!(matches!(
            builder.plan(&sources, Path::new("/out"), "LaunchImage"),
            Err(Error::Core(iconize_core::Error::MissingPlatform))
        ));
    }

    #[test]
    fn test_image_set_sizes_follow_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = CatalogBuilder::new(AssetKind::ImageSet, ExportConfig::default());
        let report = builder
            .generate(&SourceImages::single(square(90)), dir.path(), "Logo")
            .unwrap();

        assert_eq!(report.written.len(), 3);
        let set = dir.path().join("Iconize Assets/Image Sets/Logo.imageset");
        for (file, size) in [("image@1x.png", 30), ("image@2x.png", 60), ("image@3x.png", 90)] {
            let image = image::open(set.join(file)).unwrap();
            assert_eq!((image.width(), image.height()), (size, size), "{file}");
        }

        // a source that does not divide by three keeps whole points
        let dir = tempfile::tempdir().unwrap();
        let source = RgbaImage::from_pixel(100, 50, Rgba([20, 40, 60, 255]));
        builder
            .generate(&SourceImages::single(source), dir.path(), "Logo")
            .unwrap();
        let set = dir.path().join("Iconize Assets/Image Sets/Logo.imageset");
        for (file, size) in [
            ("image@1x.png", (34, 17)),
            ("image@2x.png", (68, 34)),
            ("image@3x.png", (100, 50)),
        ] {
            let image = image::open(set.join(file)).unwrap();
            assert_eq!((image.width(), image.height()), size, "{file}");
        }

        // builder state is cleared for the next export
        assert!(builder.catalog().is_empty());
        assert!(builder.manifest().is_empty());
    }
}
