//! Quarto (4x4) decision engine.
//!
//! このクレートはルールと局面を扱う `engine`、手を選択する `ai`、
//! JSON の要求・応答を扱う `protocol` を提供します。
//! 対戦サーバーとの通信（`quarto_client`）から利用されることを想定しています。

#![forbid(unsafe_code)]

/// ゲームルール・局面・進行を提供するモジュール。
pub mod engine;

/// AI（手選択アルゴリズム）を提供するモジュール。
pub mod ai;

/// 対戦サーバーとの JSON メッセージを提供するモジュール。
pub mod protocol;
