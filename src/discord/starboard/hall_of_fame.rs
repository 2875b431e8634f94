use crate::core::starboard::Promotion;
use poise::serenity_prelude as serenity;

// Discord rejects embed descriptions longer than this.
const MAX_DESCRIPTION_LEN: usize = 4096;
const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Build the Hall of Fame repost for a message that crossed the threshold.
pub fn build_embed(
    message: &serenity::Message,
    guild_id: u64,
    promotion: &Promotion,
) -> serenity::CreateEmbed {
    let link = jump_url(guild_id, message.channel_id.get(), message.id.get());

    let mut embed = serenity::CreateEmbed::new()
        .author(
            serenity::CreateEmbedAuthor::new(&message.author.name)
                .icon_url(message.author.face()),
        )
        .color(0xF1C40F)
        .field(
            "Source",
            format!("[Jump to message]({}) in <#{}>", link, message.channel_id),
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(format!(
            "{} {} | {}",
            promotion.emoji, promotion.reaction_count, message.id
        )))
        .timestamp(message.timestamp);

    if !message.content.trim().is_empty() {
        embed = embed.description(truncate(&message.content, MAX_DESCRIPTION_LEN));
    }

    if let Some(first) = message.attachments.first() {
        if is_image(&first.filename, first.content_type.as_deref()) {
            embed = embed.image(first.url.clone());
        }
    }

    embed
}

pub fn jump_url(guild_id: u64, channel_id: u64, message_id: u64) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id, channel_id, message_id
    )
}

fn is_image(filename: &str, content_type: Option<&str>) -> bool {
    if let Some(content_type) = content_type {
        return content_type.starts_with("image/");
    }
    let name = filename.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars - 3).collect();
    truncated.push_str("...");
    truncated
}
