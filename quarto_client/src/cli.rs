use core::time::Duration;
use std::net::{Ipv4Addr, SocketAddr};

use clap::{Parser, ValueEnum};
use quarto_core::ai::alphabeta::{self, ForcedProbe};
use quarto_core::ai::types::Ai;
use quarto_core::ai::{heuristic, random};

/// 手を選ぶ戦略。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum StrategyKind {
    /// 一様ランダム。
    Random,
    /// 即勝ち・防御・位置のルール。
    Heuristic,
    /// 反復深化アルファベータ探索。
    #[default]
    Alphabeta,
}

/// ログの出力形式。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    /// 人が読む形式。
    #[default]
    Text,
    /// 1行1イベントの JSON。
    Json,
}

/// コマンドライン引数。
#[derive(Debug, Parser)]
#[command(author, version, about = "Quarto AI client", long_about = None)]
pub struct Args {
    /// 対戦サーバーのアドレス
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// 対戦サーバーの参加登録ポート
    #[arg(long, default_value_t = 3000)]
    pub port_server: u16,

    /// このクライアントが要求を待ち受けるポート
    #[arg(long, default_value_t = 8080)]
    pub port_client: u16,

    /// 参加登録で名乗る名前
    #[arg(long, default_value = "quarto_rs")]
    pub name: String,

    /// 参加者の識別番号（1つ以上。`--skip-subscribe` のときは省略できる）
    #[arg(long, num_args = 1.., required_unless_present = "skip_subscribe")]
    pub matricules: Vec<String>,

    /// 手を選ぶ戦略
    #[arg(long, value_enum, default_value_t)]
    pub strategy: StrategyKind,

    /// 同点候補を選ぶ乱数のシード
    #[arg(long)]
    pub seed: Option<u64>,

    /// 通常の持ち時間（ミリ秒）
    #[arg(long)]
    pub time_budget_ms: Option<u64>,

    /// 終盤の持ち時間（ミリ秒）
    #[arg(long)]
    pub endgame_time_budget_ms: Option<u64>,

    /// 探索の最大深さ
    #[arg(long)]
    pub max_depth: Option<u8>,

    /// 強制局面の検出を行わない
    #[arg(long)]
    pub no_forced_probe: bool,

    /// 参加登録をせずに待ち受けだけ行う
    #[arg(long)]
    pub skip_subscribe: bool,

    /// ログの出力形式
    #[arg(long, value_enum, default_value_t)]
    pub log_format: LogFormat,
}

impl Args {
    /// 待ち受けアドレス（全インターフェース）。
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port_client))
    }

    /// 参加登録先のアドレス。
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port_server)
    }

    /// 引数から戦略を組み立てる。
    pub fn strategy(&self) -> Strategy {
        let mut config = alphabeta::Config::default();
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(ms) = self.time_budget_ms {
            config = config.with_time_budget(Duration::from_millis(ms));
        }
        if let Some(ms) = self.endgame_time_budget_ms {
            config = config.with_endgame_time_budget(Duration::from_millis(ms));
        }
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        if self.no_forced_probe {
            config = config.with_forced_probe(ForcedProbe::Disabled);
        }
        Strategy {
            config,
            kind: self.strategy,
        }
    }
}

/// 要求ごとに新しいエージェントを作るための設定。
#[derive(Clone, Copy, Debug)]
pub struct Strategy {
    /// 探索設定（シードは全戦略で共通）。
    config: alphabeta::Config,
    /// 戦略の種類。
    kind: StrategyKind,
}

impl Strategy {
    /// 新しいエージェントを作る。
    pub fn agent(self) -> Box<dyn Ai + Send> {
        let seed = self.config.seed;
        match self.kind {
            StrategyKind::Random => Box::new(random::Agent::new(seed)),
            StrategyKind::Heuristic => Box::new(heuristic::Agent::new(seed)),
            StrategyKind::Alphabeta => Box::new(alphabeta::Agent::new(self.config)),
        }
    }

    /// 戦略を直接指定する。
    #[cfg(test)]
    pub fn new(kind: StrategyKind, config: alphabeta::Config) -> Self {
        Self { config, kind }
    }
}
