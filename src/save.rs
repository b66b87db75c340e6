// 存档系统 - 个体的持久化与读取
// 开发心理：基因型以扁平的 基因 -> [int, int] 记录保存，表型随时可重新推导
// 唯一不能重新推导的是暗能量标志，必须作为显式布尔值与基因型一起存储

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::catalog::TraitCatalog;
use crate::core::error::{GeneticsError, GeneticsResult};
use crate::creature_engine::{AlleleOrigins, AllelePair, Creature, CreatureId, GeneticCode, Sex};

// 存档版本
pub const SAVE_VERSION: u32 = 1;

/// 单个个体的存档记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureRecord {
    pub id: CreatureId,
    pub sex: Sex,
    pub generation: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<[CreatureId; 2]>,
    pub genotype: BTreeMap<String, AllelePair>,
    /// 无默认值：缺少该字段的记录视为损坏
    pub dark_energy: bool,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub mutations: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allele_origins: Option<AlleleOrigins>,
}

impl From<&Creature> for CreatureRecord {
    fn from(creature: &Creature) -> Self {
        Self {
            id: creature.id.clone(),
            sex: creature.sex,
            generation: creature.generation,
            parents: creature.parents.clone(),
            genotype: creature
                .genotype
                .iter()
                .map(|(gene, pair)| (gene.to_string(), pair))
                .collect(),
            dark_energy: creature.dark_energy,
            mutations: creature.mutations.clone(),
            allele_origins: creature.allele_origins.clone(),
        }
    }
}

impl CreatureRecord {
    /// 校验基因型完整性与取值范围后还原个体
    pub fn into_creature(self, catalog: &TraitCatalog) -> GeneticsResult<Creature> {
        let genotype: GeneticCode = self.genotype.into_iter().collect();
        genotype.validate_against(catalog, self.id.as_str())?;

        if self.parents.is_none() && self.generation > 0 {
            warn!("个体 {} 没有亲本记录却不是第 0 代", self.id);
        }

        Ok(Creature {
            id: self.id,
            sex: self.sex,
            generation: self.generation,
            parents: self.parents,
            genotype,
            dark_energy: self.dark_energy,
            mutations: self.mutations,
            allele_origins: self.allele_origins,
        })
    }
}

// 存档文件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFile {
    pub version: u32,
    pub saved_at: u64,
    pub creatures: Vec<CreatureRecord>,
}

impl SaveFile {
    pub fn new(creatures: &[Creature]) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: unix_now(),
            creatures: creatures.iter().map(CreatureRecord::from).collect(),
        }
    }
}

/// 读取时同时接受完整存档与单个记录
#[derive(Deserialize)]
#[serde(untagged)]
enum SaveDocument {
    File(SaveFile),
    Record(CreatureRecord),
}

pub fn export_json(creatures: &[Creature]) -> GeneticsResult<String> {
    Ok(serde_json::to_string_pretty(&SaveFile::new(creatures))?)
}

pub fn export_record_json(creature: &Creature) -> GeneticsResult<String> {
    Ok(serde_json::to_string_pretty(&CreatureRecord::from(creature))?)
}

pub fn import_json(content: &str, catalog: &TraitCatalog) -> GeneticsResult<Vec<Creature>> {
    let records = match serde_json::from_str::<SaveDocument>(content)? {
        SaveDocument::File(save) => {
            if save.version > SAVE_VERSION {
                return Err(GeneticsError::SaveError(format!(
                    "save version {} is newer than supported version {}",
                    save.version, SAVE_VERSION
                )));
            }
            save.creatures
        }
        SaveDocument::Record(record) => vec![record],
    };

    let creatures = records
        .into_iter()
        .map(|record| record.into_creature(catalog))
        .collect::<GeneticsResult<Vec<_>>>()?;
    debug!("导入 {} 个个体", creatures.len());
    Ok(creatures)
}

pub fn save_to_file(path: &Path, creatures: &[Creature]) -> GeneticsResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &SaveFile::new(creatures))?;
    writer.flush()?;

    info!("保存 {} 个个体到: {:?}", creatures.len(), path);
    Ok(())
}

pub fn load_from_file(path: &Path, catalog: &TraitCatalog) -> GeneticsResult<Vec<Creature>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    let creatures = import_json(&content, catalog)?;
    info!("从 {:?} 读取 {} 个个体", path, creatures.len());
    Ok(creatures)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature_engine::{CreatureEngine, SequentialIdIssuer};
    use crate::utils::random::RandomGenerator;
    use tempfile::TempDir;

    fn population() -> (CreatureEngine, Vec<Creature>) {
        let engine = CreatureEngine::with_defaults().unwrap();
        let mut nursery = engine.nursery(SequentialIdIssuer::new("dragon"));
        let mut rng = RandomGenerator::with_seed(55);
        let a = nursery.wild(&mut rng).unwrap();
        let b = nursery.wild(&mut rng).unwrap();
        let mut creatures = nursery.hatch(&a, &b, &mut rng).unwrap();
        creatures.insert(0, b);
        creatures.insert(0, a);
        (engine, creatures)
    }

    #[test]
    fn test_json_round_trip_keeps_dark_energy() {
        let (engine, mut creatures) = population();
        creatures[0].dark_energy = true;

        let json = export_json(&creatures).unwrap();
        let restored = import_json(&json, engine.catalog()).unwrap();
        assert_eq!(restored, creatures);
        assert!(restored[0].dark_energy);
    }

    #[test]
    fn test_record_is_flat() {
        let (_, creatures) = population();
        let json = export_record_json(&creatures[0]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let pair = &value["genotype"]["body_size"];
        assert!(pair.is_array());
        assert_eq!(pair.as_array().unwrap().len(), 2);
        assert_eq!(value["darkEnergy"], false);
    }

    #[test]
    fn test_single_record_import() {
        let (engine, creatures) = population();
        let json = export_record_json(&creatures[2]).unwrap();
        let restored = import_json(&json, engine.catalog()).unwrap();
        assert_eq!(restored, vec![creatures[2].clone()]);
    }

    #[test]
    fn test_missing_dark_energy_rejected() {
        let (engine, creatures) = population();
        let mut value = serde_json::to_value(CreatureRecord::from(&creatures[0])).unwrap();
        value.as_object_mut().unwrap().remove("darkEnergy");
        assert!(import_json(&value.to_string(), engine.catalog()).is_err());
    }

    #[test]
    fn test_import_validates_genotype() {
        let (engine, creatures) = population();

        let mut incomplete = CreatureRecord::from(&creatures[0]);
        incomplete.genotype.remove("frame");
        let json = serde_json::to_string(&incomplete).unwrap();
        assert!(matches!(
            import_json(&json, engine.catalog()),
            Err(GeneticsError::StructuralMismatch { .. })
        ));

        let mut out_of_range = CreatureRecord::from(&creatures[0]);
        out_of_range.genotype.insert("frame".to_string(), [0, 9]);
        let json = serde_json::to_string(&out_of_range).unwrap();
        assert!(matches!(
            import_json(&json, engine.catalog()),
            Err(GeneticsError::AlleleOutOfRange { .. })
        ));
    }

    #[test]
    fn test_newer_version_rejected() {
        let (engine, creatures) = population();
        let mut save = SaveFile::new(&creatures);
        save.version = SAVE_VERSION + 1;
        let json = serde_json::to_string(&save).unwrap();
        assert!(matches!(
            import_json(&json, engine.catalog()),
            Err(GeneticsError::SaveError(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("saves").join("roost.json");
        let (engine, creatures) = population();

        save_to_file(&path, &creatures).unwrap();
        assert!(path.exists());
        let restored = load_from_file(&path, engine.catalog()).unwrap();
        assert_eq!(restored, creatures);
    }
}
