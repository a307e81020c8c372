mod obj;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use terravox_mesh_cpu::MeshMode;
use terravox_runtime::{BuildJob, Runtime};
use terravox_world::{load_world_file, plan_world_extents_probed};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Blocks,
    MarchingCubes,
    Smoothed,
    Hybrid,
    Micro,
}

#[derive(Parser, Debug)]
#[command(name = "terravox", about = "Generate and mesh a voxel terrain from a world file")]
struct Args {
    /// TOML world description.
    #[arg(long)]
    world: PathBuf,

    /// Mesh extraction style.
    #[arg(long, value_enum, default_value_t = ModeArg::MarchingCubes)]
    mode: ModeArg,

    /// Sub-voxel subdivisions for --mode micro.
    #[arg(long, default_value_t = 4)]
    micro_div: u32,

    /// Dump one OBJ per non-empty chunk into this directory.
    #[arg(long)]
    obj_dir: Option<PathBuf>,

    /// Worker threads; defaults to the machine's parallelism.
    #[arg(long)]
    threads: Option<usize>,
}

impl Args {
    fn mesh_mode(&self) -> MeshMode {
        match self.mode {
            ModeArg::Blocks => MeshMode::Blocks,
            ModeArg::MarchingCubes => MeshMode::MarchingCubes,
            ModeArg::Smoothed => MeshMode::SmoothedBlocks,
            ModeArg::Hybrid => MeshMode::HybridBlocks,
            ModeArg::Micro => MeshMode::MicroBlocks {
                subdivisions: self.micro_div,
            },
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let ctx = match load_world_file(&args.world) {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            log::error!("failed to load {}: {e}", args.world.display());
            return ExitCode::FAILURE;
        }
    };

    let extents = plan_world_extents_probed(&ctx);
    let (nx, ny, nz) = extents.chunk_counts();
    log::info!(
        "world: {} features, chunk grid {nx}x{ny}x{nz} ({} chunks), {} cells/chunk",
        ctx.features().len(),
        extents.chunk_count(),
        ctx.settings.chunk_cells,
    );

    if let Some(dir) = &args.obj_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            log::error!("cannot create {}: {e}", dir.display());
            return ExitCode::FAILURE;
        }
    }

    let mode = args.mesh_mode();
    let rt = Runtime::new(ctx, args.threads);
    log::info!("building with {} workers ({mode:?})", rt.workers());

    let t0 = Instant::now();
    let mut submitted = 0u64;
    for coord in extents.iter() {
        rt.submit_build_job(BuildJob {
            coord,
            mode,
            job_id: submitted,
        });
        submitted += 1;
    }

    let mut populated = 0u64;
    let mut verts = 0usize;
    let mut tris = 0usize;
    let mut gen_ms = 0u64;
    let mut mesh_ms = 0u64;
    let mut received = 0u64;
    while received < submitted {
        let Some(out) = rt.recv_result() else {
            log::error!("workers exited early ({received}/{submitted} chunks)");
            return ExitCode::FAILURE;
        };
        received += 1;
        gen_ms += u64::from(out.t_gen_ms);
        mesh_ms += u64::from(out.t_mesh_ms);
        if let Some(mesh) = &out.mesh {
            populated += 1;
            verts += mesh.vertex_count();
            tris += mesh.triangle_count();
            if let Some(dir) = &args.obj_dir {
                if !mesh.is_empty() {
                    if let Err(e) = obj::write_chunk_obj(dir, mesh) {
                        log::error!("obj export for chunk {} failed: {e}", out.coord);
                        return ExitCode::FAILURE;
                    }
                }
            }
        }
    }

    log::info!(
        "done in {:.2}s: {populated}/{submitted} chunks populated, {verts} verts, {tris} tris \
         (cpu time: gen {gen_ms}ms, mesh {mesh_ms}ms)",
        t0.elapsed().as_secs_f64(),
    );
    ExitCode::SUCCESS
}
