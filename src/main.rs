// 龙类遗传核心命令行入口
// 开发心理：生成、繁殖、解析、稀有度统计四个子命令，输出均为 JSON，便于脚本处理

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dragonbreed::creature_engine::RarityReport;
use dragonbreed::save::{self, CreatureRecord};
use dragonbreed::{
    Creature, CreatureEngine, EngineConfig, Phenotype, RandomGenerator, Rarity, TraitCatalog,
    UuidIdIssuer,
};

#[derive(Parser)]
#[command(name = "dragonbreed", version, about = "Dragon genetics: generate, breed and resolve")]
struct Cli {
    /// 固定随机种子，结果可复现
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// 基因目录 JSON，缺省使用内置目录
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// 引擎配置 TOML，不存在时写出默认配置
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Capture wild dragons and print them with their phenotypes
    Generate {
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Also write the creatures to a save file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Breed the first creature of each record file
    Breed {
        parent_a: PathBuf,
        parent_b: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Resolve every creature stored in a record or save file
    Resolve { record: PathBuf },
    /// Sample wild genotypes and report rarity, key and tier-key frequencies
    Rarity {
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    record: CreatureRecord,
    title: String,
    rarity: Rarity,
    phenotype: Phenotype,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run() {
        error!("运行失败: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => TraitCatalog::load(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => TraitCatalog::builtin().context("loading built-in catalog")?,
    };
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = CreatureEngine::new(Arc::new(catalog), config)?;

    let mut rng = match cli.seed {
        Some(seed) => RandomGenerator::with_seed(seed),
        None => RandomGenerator::new(),
    };
    info!("dragonbreed v{} 随机种子 {}", dragonbreed::VERSION, rng.seed());

    match cli.cmd {
        Cmd::Generate { count, out } => {
            let mut nursery = engine.nursery(UuidIdIssuer);
            let creatures = (0..count)
                .map(|_| nursery.wild(&mut rng))
                .collect::<Result<Vec<_>, _>>()?;
            print_entries(&engine, &creatures)?;
            if let Some(path) = out {
                save::save_to_file(&path, &creatures)?;
            }
        }
        Cmd::Breed {
            parent_a,
            parent_b,
            out,
        } => {
            let a = first_creature(&engine, &parent_a)?;
            let b = first_creature(&engine, &parent_b)?;
            let mut nursery = engine.nursery(UuidIdIssuer);
            let clutch = nursery.hatch(&a, &b, &mut rng)?;
            print_entries(&engine, &clutch)?;
            if let Some(path) = out {
                save::save_to_file(&path, &clutch)?;
            }
        }
        Cmd::Resolve { record } => {
            let creatures = save::load_from_file(&record, engine.catalog())
                .with_context(|| format!("reading {}", record.display()))?;
            print_entries(&engine, &creatures)?;
        }
        Cmd::Rarity { samples } => {
            let mut report = RarityReport::default();
            for _ in 0..samples {
                let code = engine.generate(&mut rng)?;
                let dark_energy = engine.roll_dark_energy(&code, &mut rng)?;
                report.record(&engine.resolve(&code, dark_energy)?);
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn first_creature(engine: &CreatureEngine, path: &Path) -> Result<Creature> {
    let creatures = save::load_from_file(path, engine.catalog())
        .with_context(|| format!("reading {}", path.display()))?;
    match creatures.into_iter().next() {
        Some(creature) => Ok(creature),
        None => bail!("{} contains no creatures", path.display()),
    }
}

fn print_entries(engine: &CreatureEngine, creatures: &[Creature]) -> Result<()> {
    let entries = creatures
        .iter()
        .map(|creature| {
            let phenotype = creature.phenotype(engine.resolver())?;
            Ok(Entry {
                record: CreatureRecord::from(creature),
                title: phenotype.title(),
                rarity: Rarity::of(&phenotype),
                phenotype,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
