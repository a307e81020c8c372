//! Runtime job queue and worker orchestration for chunk builds.
#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};
use terravox_chunk::{ChunkOccupancy, generate_chunk_voxels};
use terravox_mesh_cpu::{ChunkMeshCPU, MeshMode, extract_chunk_mesh};
use terravox_world::{ChunkCoord, TerrainContext};

#[derive(Clone, Copy, Debug)]
pub struct BuildJob {
    pub coord: ChunkCoord,
    pub mode: MeshMode,
    pub job_id: u64,
}

pub struct JobOut {
    pub coord: ChunkCoord,
    pub job_id: u64,
    pub occupancy: ChunkOccupancy,
    /// `None` when the chunk sampled all-air.
    pub mesh: Option<ChunkMeshCPU>,
    pub t_gen_ms: u32,
    pub t_mesh_ms: u32,
    pub t_total_ms: u32,
}

#[inline]
fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_build_job(job: BuildJob, ctx: &TerrainContext, tx: &Sender<JobOut>) {
    let t_job_start = Instant::now();

    let t0 = Instant::now();
    let generated = generate_chunk_voxels(ctx, job.coord);
    let t_gen_ms = elapsed_ms(t0);

    if generated.occupancy.is_empty() {
        let _ = tx.send(JobOut {
            coord: job.coord,
            job_id: job.job_id,
            occupancy: generated.occupancy,
            mesh: None,
            t_gen_ms,
            t_mesh_ms: 0,
            t_total_ms: elapsed_ms(t_job_start),
        });
        return;
    }

    let t0 = Instant::now();
    let mesh = extract_chunk_mesh(
        &generated.buf,
        ctx.settings.voxel_size,
        Some(ctx),
        job.mode,
    );
    let t_mesh_ms = elapsed_ms(t0);

    let _ = tx.send(JobOut {
        coord: job.coord,
        job_id: job.job_id,
        occupancy: generated.occupancy,
        mesh: Some(mesh),
        t_gen_ms,
        t_mesh_ms,
        t_total_ms: elapsed_ms(t_job_start),
    });
}

/// Worker pool that samples and meshes chunks off the caller's thread.
///
/// The terrain context is an immutable snapshot behind a swap slot: workers
/// take the current snapshot per job, so a swap never tears a chunk that is
/// mid-build, and every job sees exactly one context.
pub struct Runtime {
    job_tx: Sender<BuildJob>,
    res_rx: Receiver<JobOut>,
    _pool: Arc<ThreadPool>,
    ctx: Arc<RwLock<Arc<TerrainContext>>>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    workers: usize,
}

impl Runtime {
    pub fn new(ctx: Arc<TerrainContext>, threads: Option<usize>) -> Self {
        let workers = threads.unwrap_or_else(|| {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(8)
        });
        let (job_tx, job_rx) = unbounded::<BuildJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let ctx_slot = Arc::new(RwLock::new(ctx));
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("terravox-build-{i}"))
                .build()
                .expect("build pool"),
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let ctx_slot = ctx_slot.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    let snapshot = ctx_slot
                        .read()
                        .unwrap_or_else(|e| e.into_inner())
                        .clone();
                    process_build_job(job, snapshot.as_ref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }

        Self {
            job_tx,
            res_rx,
            _pool: pool,
            ctx: ctx_slot,
            queued,
            inflight,
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Current context snapshot.
    pub fn context(&self) -> Arc<TerrainContext> {
        self.ctx.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Installs a new snapshot. In-flight jobs finish against the one they
    /// already took; jobs picked up afterwards see the new one.
    pub fn swap_context(&self, ctx: Arc<TerrainContext>) {
        *self.ctx.write().unwrap_or_else(|e| e.into_inner()) = ctx;
        log::debug!("terrain context swapped");
    }

    pub fn submit_build_job(&self, job: BuildJob) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Non-blocking drain of everything finished so far.
    pub fn drain_worker_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks until one result is ready; `None` once all senders are gone.
    pub fn recv_result(&self) -> Option<JobOut> {
        self.res_rx.recv().ok()
    }

    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}
