use serde::{Deserialize, Serialize};
use stardrop_common::draw::Pool;
use std::collections::BTreeMap;
use std::fs;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Log {
    pub level: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Bot {
    pub prefix: String,
    /// Embed colour as `0xRRGGBB`.
    pub colour: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Debug {
    pub allowed_users: Vec<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Mongo {
    pub database: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Play {
    pub pool: String,
    pub solo_count: usize,
    pub multi_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub log: Log,
    pub bot: Bot,
    pub debug: Debug,
    pub mongo: Mongo,
    pub play: Play,
    pub pools: BTreeMap<String, Pool>,
}

impl Config {
    pub fn new() -> Config {
        Config {
            log: Log {
                level: "info".to_string(),
            },
            bot: Bot {
                prefix: "$".to_string(),
                colour: 0xFF3B72,
            },
            debug: Debug {
                allowed_users: vec![],
            },
            mongo: Mongo {
                database: "stardrop".to_string(),
            },
            play: Play {
                pool: "star".to_string(),
                solo_count: 1,
                multi_count: 10,
            },
            pools: BTreeMap::from([("star".to_string(), Pool::standard())]),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, pool) in &self.pools {
            pool.validate(name).map_err(|why| why.to_string())?;
        }
        if !self.pools.contains_key(&self.play.pool) {
            return Err(format!("Play pool {} is not configured", self.play.pool));
        }
        if self.play.solo_count == 0 || self.play.multi_count == 0 {
            return Err("Play counts must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn save(&self, path: &str) -> Result<(), String> {
        let toml = match toml::to_string(&self) {
            Ok(toml) => toml,
            Err(why) => return Err(format!("Failed to serialize config: {:?}", why)),
        };
        match fs::write(path, toml) {
            Ok(_) => Ok(()),
            Err(why) => Err(format!("Failed to write config file: {:?}", why)),
        }
    }

    pub fn load(path: &str) -> Result<Config, String> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(why) => return Err(format!("Failed to read config file: {:?}", why)),
        };
        match toml::from_str(content.as_str()) {
            Ok(config) => Ok(config),
            Err(why) => Err(format!("Failed to parse config file: {}", why)),
        }
    }
}
