//! Entry point for the prism viewer.
//! Logging + CLI flags, then hand over to the platform loop.

use std::path::PathBuf;

use anyhow::Result;
use asset::{LoadOptions, MaterialSource, MissingFilePolicy, Triangulation, mtl::DEFAULT_MATERIAL};
use clap::{Parser, ValueEnum};
use corelib::viewport::Viewport;
use platform::ViewerConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum GpuBackend {
    #[default]
    Auto,
    #[value(alias = "vk")]
    Vulkan,
    #[value(alias = "d3d12")]
    Dx12,
    #[value(alias = "mtl")]
    Metal,
    #[value(alias = "opengl", alias = "gles")]
    Gl,
}

impl GpuBackend {
    fn backends(self) -> wgpu::Backends {
        match self {
            GpuBackend::Auto => wgpu::Backends::all(),
            GpuBackend::Vulkan => wgpu::Backends::VULKAN,
            GpuBackend::Dx12 => wgpu::Backends::DX12,
            GpuBackend::Metal => wgpu::Backends::METAL,
            GpuBackend::Gl => wgpu::Backends::GL,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "prismview")]
#[command(version, about = "Draw an OBJ mesh with a solid fill and a black outline", long_about = None)]
struct ViewerArgs {
    /// OBJ file to draw
    #[arg(long, default_value = "assets/prism.obj")]
    obj: PathBuf,

    /// Companion MTL file to take the fill color from
    #[arg(long)]
    mtl: Option<PathBuf>,

    /// Material block to read from the MTL file
    #[arg(long, default_value = DEFAULT_MATERIAL)]
    material: String,

    /// Rotate with arrow keys / WASD (R resets)
    #[arg(long)]
    rotate: bool,

    /// Fan-triangulate faces with more than three vertices
    #[arg(long)]
    fan: bool,

    /// Treat missing input files as empty instead of failing
    #[arg(long)]
    allow_missing: bool,

    /// Graphics backend
    #[arg(long, value_enum, default_value_t = GpuBackend::Auto)]
    gpu_backend: GpuBackend,

    /// Window size as WIDTHxHEIGHT
    #[arg(long, default_value_t = Viewport::DEFAULT)]
    size: Viewport,

    /// Show frames per second in the window title
    #[arg(long)]
    show_fps: bool,
}

impl ViewerArgs {
    fn into_config(self) -> ViewerConfig {
        let load_options = LoadOptions {
            triangulation: if self.fan {
                Triangulation::Fan
            } else {
                Triangulation::FirstTriangle
            },
            missing_file: if self.allow_missing {
                MissingFilePolicy::Empty
            } else {
                MissingFilePolicy::Error
            },
        };

        ViewerConfig {
            material: self.mtl.map(|path| MaterialSource::new(path, self.material)),
            obj_path: self.obj,
            load_options,
            backends: self.gpu_backend.backends(),
            size: self.size,
            rotate: self.rotate,
            show_fps: self.show_fps,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = ViewerArgs::parse();
    log::info!(
        "Starting prismview. obj={}, mtl={:?}, backend={:?}, size={}, rotate={}",
        args.obj.display(),
        args.mtl,
        args.gpu_backend,
        args.size,
        args.rotate
    );

    platform::run_with_renderer(args.into_config())?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_static_prism() {
        let config = ViewerArgs::parse_from(["prismview"]).into_config();
        assert_eq!(config.obj_path, PathBuf::from("assets/prism.obj"));
        assert!(config.material.is_none());
        assert_eq!(config.load_options, LoadOptions::default());
        assert_eq!(config.size, Viewport::DEFAULT);
        assert_eq!(config.backends, wgpu::Backends::all());
        assert!(!config.rotate);
    }

    #[test]
    fn flags_build_full_config() {
        let config = ViewerArgs::parse_from([
            "prismview",
            "--obj",
            "assets/prism.obj",
            "--mtl",
            "assets/prism.mtl",
            "--material",
            "Red",
            "--rotate",
            "--fan",
            "--allow-missing",
            "--gpu-backend",
            "vk",
            "--size",
            "1024x768",
        ])
        .into_config();

        assert_eq!(
            config.material,
            Some(MaterialSource::new("assets/prism.mtl", "Red"))
        );
        assert_eq!(config.load_options.triangulation, Triangulation::Fan);
        assert_eq!(config.load_options.missing_file, MissingFilePolicy::Empty);
        assert_eq!(config.backends, wgpu::Backends::VULKAN);
        assert_eq!(config.size, Viewport { width: 1024, height: 768 });
        assert!(config.rotate);
    }

    #[test]
    fn bad_size_is_rejected() {
        assert!(ViewerArgs::try_parse_from(["prismview", "--size", "0x10"]).is_err());
    }

    #[test]
    fn material_defaults_to_blue() {
        let config = ViewerArgs::parse_from(["prismview", "--mtl", "m.mtl"]).into_config();
        assert_eq!(config.material.map(|m| m.name), Some("Blue".to_owned()));
    }
}
