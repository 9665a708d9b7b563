use std::time::Duration;

/// Status lines cycled on the loading screen. Purely cosmetic.
pub const PROCESSING_PHRASES: [&str; 6] = [
    "Analisando o perfil do cliente...",
    "Estudando o nicho de mercado...",
    "Escrevendo ganchos virais...",
    "Refinando as chamadas para ação...",
    "Gerando estratégias de conversão...",
    "Otimizando para Reels e TikTok...",
];

pub const PHRASE_INTERVAL: Duration = Duration::from_secs(3);

pub fn phrase_at(index: usize) -> &'static str {
    PROCESSING_PHRASES[index % PROCESSING_PHRASES.len()]
}
