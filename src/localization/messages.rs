use crate::config::{PaymentDetails, PaymentMethod};

/// supported languages for the bot UI
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    En,
    Ru,
}

impl Lang {
    /// creates Lang from Telegram's language_code (e.g., "ru", "en", "uk")
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(code) if code == "ru" || code.starts_with("ru-") => Lang::Ru,
            _ => Lang::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
        }
    }
}

// =============================================================================
// Welcome / general
// =============================================================================

impl Lang {
    pub fn welcome(&self) -> &'static str {
        match self {
            Lang::En => "👋 <b>Welcome!</b>\n\n\
                Here you can find our payment details and let us know once you've paid.\n\
                You can also send files for the album.\n\n\
                Choose an option below:",
            Lang::Ru => "👋 <b>Добро пожаловать!</b>\n\n\
                Здесь вы найдёте реквизиты для оплаты и сможете сообщить нам об оплате.\n\
                Также можно отправить файлы для альбома.\n\n\
                Выберите вариант ниже:",
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Lang::En => "ℹ️ <b>How to use this bot</b>\n\n\
                • /start — open the main menu\n\
                • Payment options — see where to send the payment\n\
                • After paying, tap “I've sent the payment” and we'll confirm it\n\
                • Album — send photos or PDF files\n\n\
                Any other message is forwarded to the organizers.",
            Lang::Ru => "ℹ️ <b>Как пользоваться ботом</b>\n\n\
                • /start — открыть главное меню\n\
                • Способы оплаты — реквизиты для оплаты\n\
                • После оплаты нажмите «Я отправил(а) оплату», и мы её подтвердим\n\
                • Альбом — отправка фото или PDF-файлов\n\n\
                Любое другое сообщение будет передано организаторам.",
        }
    }

    pub fn contact(&self) -> &'static str {
        match self {
            Lang::En => "📨 Thanks! Your message has been passed to the organizers, they will get back to you soon.",
            Lang::Ru => "📨 Спасибо! Ваше сообщение передано организаторам, они скоро ответят.",
        }
    }

    pub fn error_processing_request(&self) -> &'static str {
        match self {
            Lang::En => "❌ Error processing your request. Please try again later.",
            Lang::Ru => "❌ Ошибка обработки запроса. Попробуйте позже.",
        }
    }

    pub fn btn_payment_options(&self) -> &'static str {
        match self {
            Lang::En => "💳 Payment options",
            Lang::Ru => "💳 Способы оплаты",
        }
    }

    pub fn btn_album(&self) -> &'static str {
        match self {
            Lang::En => "📸 Album",
            Lang::Ru => "📸 Альбом",
        }
    }

    pub fn btn_back(&self) -> &'static str {
        match self {
            Lang::En => "⬅️ Back",
            Lang::Ru => "⬅️ Назад",
        }
    }
}

// =============================================================================
// Payment options
// =============================================================================

impl Lang {
    pub fn payment_header(&self) -> &'static str {
        match self {
            Lang::En => "💳 Choose a payment method:",
            Lang::Ru => "💳 Выберите способ оплаты:",
        }
    }

    pub fn payment_method_label(&self, method: PaymentMethod) -> &'static str {
        match (self, method) {
            (Lang::En, PaymentMethod::Bank) => "🏦 Bank transfer",
            (Lang::En, PaymentMethod::Visa) => "💳 Visa / Revolut",
            (Lang::En, PaymentMethod::TelegramWallet) => "👛 Telegram Wallet",
            (Lang::En, PaymentMethod::Crypto) => "🪙 Crypto (USDT TRC20)",
            (Lang::Ru, PaymentMethod::Bank) => "🏦 Банковский перевод",
            (Lang::Ru, PaymentMethod::Visa) => "💳 Visa / Revolut",
            (Lang::Ru, PaymentMethod::TelegramWallet) => "👛 Telegram Wallet",
            (Lang::Ru, PaymentMethod::Crypto) => "🪙 Криптовалюта (USDT TRC20)",
        }
    }

    /// requisites for one payment method; values are inserted verbatim inside <code>
    pub fn payment_details(&self, method: PaymentMethod, details: &PaymentDetails) -> String {
        match (self, method) {
            (Lang::En, PaymentMethod::Bank) => format!(
                "🏦 <b>Bank transfer</b>\n\n\
                Bank: <code>{}</code>\n\
                Recipient: <code>{}</code>\n\
                IBAN: <code>{}</code>\n\
                SWIFT: <code>{}</code>\n\
                Account: <code>{}</code>\n\n\
                After the transfer, tap the button below.",
                details.bank_name,
                details.recipient_name,
                details.iban,
                details.swift,
                details.account_number
            ),
            (Lang::Ru, PaymentMethod::Bank) => format!(
                "🏦 <b>Банковский перевод</b>\n\n\
                Банк: <code>{}</code>\n\
                Получатель: <code>{}</code>\n\
                IBAN: <code>{}</code>\n\
                SWIFT: <code>{}</code>\n\
                Счёт: <code>{}</code>\n\n\
                После перевода нажмите кнопку ниже.",
                details.bank_name,
                details.recipient_name,
                details.iban,
                details.swift,
                details.account_number
            ),
            (Lang::En, PaymentMethod::Visa) => format!(
                "💳 <b>Visa / Revolut</b>\n\n\
                Card: <code>{}</code>\n\
                Cardholder: <code>{}</code>\n\
                Revolut: <code>@{}</code>\n\n\
                After the transfer, tap the button below.",
                details.visa_card_number, details.cardholder_name, details.revolut_username
            ),
            (Lang::Ru, PaymentMethod::Visa) => format!(
                "💳 <b>Visa / Revolut</b>\n\n\
                Карта: <code>{}</code>\n\
                Владелец: <code>{}</code>\n\
                Revolut: <code>@{}</code>\n\n\
                После перевода нажмите кнопку ниже.",
                details.visa_card_number, details.cardholder_name, details.revolut_username
            ),
            (Lang::En, PaymentMethod::TelegramWallet) => "👛 <b>Telegram Wallet</b>\n\n\
                Send the payment through Telegram Wallet to the organizer, then tap the button below."
                .to_string(),
            (Lang::Ru, PaymentMethod::TelegramWallet) => "👛 <b>Telegram Wallet</b>\n\n\
                Отправьте оплату организатору через Telegram Wallet, затем нажмите кнопку ниже."
                .to_string(),
            (Lang::En, PaymentMethod::Crypto) => format!(
                "🪙 <b>Crypto (USDT TRC20)</b>\n\n\
                Wallet: <code>{}</code>\n\n\
                Double-check the network before sending. After the transfer, tap the button below.",
                details.trc20_wallet_address
            ),
            (Lang::Ru, PaymentMethod::Crypto) => format!(
                "🪙 <b>Криптовалюта (USDT TRC20)</b>\n\n\
                Кошелёк: <code>{}</code>\n\n\
                Проверьте сеть перед отправкой. После перевода нажмите кнопку ниже.",
                details.trc20_wallet_address
            ),
        }
    }

    pub fn btn_confirm_payment(&self) -> &'static str {
        match self {
            Lang::En => "✅ I've sent the payment",
            Lang::Ru => "✅ Я отправил(а) оплату",
        }
    }

    pub fn confirm_request_sent(&self) -> &'static str {
        match self {
            Lang::En => "🙏 Thank you! We've received your notice and will confirm the payment shortly.",
            Lang::Ru => "🙏 Спасибо! Мы получили ваше уведомление и скоро подтвердим оплату.",
        }
    }

    pub fn payment_confirmed_user(&self) -> &'static str {
        match self {
            Lang::En => "🎉 Your payment has been confirmed. Thank you!",
            Lang::Ru => "🎉 Ваша оплата подтверждена. Спасибо!",
        }
    }
}

// =============================================================================
// Admin notifications
// =============================================================================

impl Lang {
    pub fn admin_confirm_request(
        &self,
        full_name: &str,
        username: &str,
        user_id: &str,
        payment_method: &str,
        date: &str,
    ) -> String {
        match self {
            Lang::En => format!(
                "💰 <b>New payment confirmation</b>\n\n\
                From: {full_name}\n\
                Username: @{username}\n\
                User ID: <code>{user_id}</code>\n\
                Method: {payment_method}\n\
                Date: {date}"
            ),
            Lang::Ru => format!(
                "💰 <b>Новое подтверждение оплаты</b>\n\n\
                От: {full_name}\n\
                Username: @{username}\n\
                ID пользователя: <code>{user_id}</code>\n\
                Способ: {payment_method}\n\
                Дата: {date}"
            ),
        }
    }

    pub fn btn_admin_confirm(&self) -> &'static str {
        match self {
            Lang::En => "✅ Confirm payment received",
            Lang::Ru => "✅ Подтвердить получение оплаты",
        }
    }

    pub fn confirm_already_processed(&self) -> &'static str {
        match self {
            Lang::En => "This confirmation has already been processed.",
            Lang::Ru => "Это подтверждение уже обработано.",
        }
    }

    pub fn payment_confirmed_admin(&self, username: &str, user_id: &str, admin_name: &str) -> String {
        match self {
            Lang::En => format!(
                "✅ <b>Payment confirmed</b>\n\n\
                User: @{username} (<code>{user_id}</code>)\n\
                Confirmed by: {admin_name}"
            ),
            Lang::Ru => format!(
                "✅ <b>Оплата подтверждена</b>\n\n\
                Пользователь: @{username} (<code>{user_id}</code>)\n\
                Подтвердил(а): {admin_name}"
            ),
        }
    }

    pub fn album_admin_notification(
        &self,
        full_name: &str,
        username: &str,
        file_type: &str,
        date: &str,
    ) -> String {
        match self {
            Lang::En => format!(
                "📸 <b>New album file</b>\n\n\
                From: {full_name}\n\
                Username: @{username}\n\
                Type: {file_type}\n\
                Date: {date}"
            ),
            Lang::Ru => format!(
                "📸 <b>Новый файл для альбома</b>\n\n\
                От: {full_name}\n\
                Username: @{username}\n\
                Тип: {file_type}\n\
                Дата: {date}"
            ),
        }
    }

    pub fn forwarded_message(&self, full_name: &str, username: &str, user_id: &str, text: &str) -> String {
        match self {
            Lang::En => format!(
                "💬 <b>New message</b>\n\n\
                From: {full_name}\n\
                Username: @{username}\n\
                User ID: <code>{user_id}</code>\n\n\
                “{text}”"
            ),
            Lang::Ru => format!(
                "💬 <b>Новое сообщение</b>\n\n\
                От: {full_name}\n\
                Username: @{username}\n\
                ID пользователя: <code>{user_id}</code>\n\n\
                «{text}»"
            ),
        }
    }
}

// =============================================================================
// Admin console
// =============================================================================

impl Lang {
    pub fn admin_not_authorized(&self) -> &'static str {
        match self {
            Lang::En => "⛔ You are not authorized to use this command.",
            Lang::Ru => "⛔ У вас нет доступа к этой команде.",
        }
    }

    pub fn admin_home(&self) -> &'static str {
        match self {
            Lang::En => "🛠 <b>Admin panel</b>\n\nWhat would you like to review?",
            Lang::Ru => "🛠 <b>Панель администратора</b>\n\nЧто вы хотите просмотреть?",
        }
    }

    pub fn btn_admin_confirmations(&self) -> &'static str {
        match self {
            Lang::En => "💰 Payment confirmations",
            Lang::Ru => "💰 Подтверждения оплаты",
        }
    }

    pub fn btn_admin_album(&self) -> &'static str {
        match self {
            Lang::En => "📸 Album submissions",
            Lang::Ru => "📸 Файлы альбома",
        }
    }

    pub fn btn_admin_home(&self) -> &'static str {
        match self {
            Lang::En => "🏠 Admin panel",
            Lang::Ru => "🏠 Панель администратора",
        }
    }

    pub fn btn_refresh(&self) -> &'static str {
        match self {
            Lang::En => "🔄 Refresh",
            Lang::Ru => "🔄 Обновить",
        }
    }

    pub fn btn_prev_page(&self) -> &'static str {
        match self {
            Lang::En => "◀️ Previous",
            Lang::Ru => "◀️ Назад",
        }
    }

    pub fn btn_next_page(&self) -> &'static str {
        match self {
            Lang::En => "Next ▶️",
            Lang::Ru => "Далее ▶️",
        }
    }

    pub fn btn_back_to_list(&self) -> &'static str {
        match self {
            Lang::En => "⬅️ Back to list",
            Lang::Ru => "⬅️ К списку",
        }
    }

    pub fn btn_download(&self) -> &'static str {
        match self {
            Lang::En => "⬇️ Download",
            Lang::Ru => "⬇️ Скачать",
        }
    }

    pub fn admin_no_confirmations(&self) -> &'static str {
        match self {
            Lang::En => "📭 No payment confirmations yet.",
            Lang::Ru => "📭 Подтверждений оплаты пока нет.",
        }
    }

    pub fn admin_list_header(&self, count: usize) -> String {
        match self {
            Lang::En => format!("💰 <b>Payment confirmations</b> ({count})"),
            Lang::Ru => format!("💰 <b>Подтверждения оплаты</b> ({count})"),
        }
    }

    pub fn admin_list_item(
        &self,
        index: usize,
        username: &str,
        payment_method: &str,
        status: &str,
        date: &str,
    ) -> String {
        // same layout in both languages
        format!("{index}. {status} @{username} · {payment_method} · {date}")
    }

    pub fn admin_page_indicator(&self, page: usize, total_pages: usize) -> String {
        match self {
            Lang::En => format!("📄 Page {page}/{total_pages}"),
            Lang::Ru => format!("📄 Страница {page}/{total_pages}"),
        }
    }

    pub fn status_confirmed(&self) -> &'static str {
        match self {
            Lang::En => "✅ Confirmed",
            Lang::Ru => "✅ Подтверждено",
        }
    }

    pub fn status_pending(&self) -> &'static str {
        match self {
            Lang::En => "⏳ Pending",
            Lang::Ru => "⏳ Ожидает",
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn admin_detail(
        &self,
        full_name: &str,
        username: &str,
        user_id: &str,
        payment_method: &str,
        status: &str,
        date: &str,
        confirmed: Option<(&str, &str)>,
    ) -> String {
        let mut text = match self {
            Lang::En => format!(
                "🧾 <b>Payment confirmation</b>\n\n\
                Name: {full_name}\n\
                Username: @{username}\n\
                User ID: <code>{user_id}</code>\n\
                Method: {payment_method}\n\
                Status: {status}\n\
                Date: {date}"
            ),
            Lang::Ru => format!(
                "🧾 <b>Подтверждение оплаты</b>\n\n\
                Имя: {full_name}\n\
                Username: @{username}\n\
                ID пользователя: <code>{user_id}</code>\n\
                Способ: {payment_method}\n\
                Статус: {status}\n\
                Дата: {date}"
            ),
        };
        if let Some((confirmed_at, confirmed_by)) = confirmed {
            let line = match self {
                Lang::En => format!("\nConfirmed: {confirmed_at} by <code>{confirmed_by}</code>"),
                Lang::Ru => format!("\nПодтверждено: {confirmed_at}, <code>{confirmed_by}</code>"),
            };
            text.push_str(&line);
        }
        text
    }

    pub fn confirmation_not_found(&self) -> &'static str {
        match self {
            Lang::En => "Confirmation not found.",
            Lang::Ru => "Подтверждение не найдено.",
        }
    }

    pub fn submission_not_found(&self) -> &'static str {
        match self {
            Lang::En => "Submission not found.",
            Lang::Ru => "Файл не найден.",
        }
    }

    pub fn admin_album_empty(&self) -> &'static str {
        match self {
            Lang::En => "📭 No album submissions yet.",
            Lang::Ru => "📭 Файлов для альбома пока нет.",
        }
    }

    pub fn admin_album_caption(
        &self,
        ordinal: usize,
        total: usize,
        username: &str,
        file_type: &str,
        date: &str,
        caption: Option<&str>,
    ) -> String {
        let mut text = match self {
            Lang::En => format!(
                "📸 <b>Submission {ordinal}/{total}</b>\n\n\
                From: @{username}\n\
                Type: {file_type}\n\
                Date: {date}"
            ),
            Lang::Ru => format!(
                "📸 <b>Файл {ordinal}/{total}</b>\n\n\
                От: @{username}\n\
                Тип: {file_type}\n\
                Дата: {date}"
            ),
        };
        if let Some(caption) = caption {
            let line = match self {
                Lang::En => format!("\nCaption: {caption}"),
                Lang::Ru => format!("\nПодпись: {caption}"),
            };
            text.push_str(&line);
        }
        text
    }

    pub fn admin_album_file_details(&self, file_name: &str, storage_path: &str) -> String {
        match self {
            Lang::En => format!("\nFile: {file_name}\nPath: <code>{storage_path}</code>"),
            Lang::Ru => format!("\nФайл: {file_name}\nПуть: <code>{storage_path}</code>"),
        }
    }
}

// =============================================================================
// Album intake
// =============================================================================

impl Lang {
    pub fn album_intro(&self) -> &'static str {
        match self {
            Lang::En => "📸 <b>Album</b>\n\n\
                We're collecting photos for the shared album. \
                Please read the guidelines, then send your file.",
            Lang::Ru => "📸 <b>Альбом</b>\n\n\
                Мы собираем фотографии для общего альбома. \
                Пожалуйста, ознакомьтесь с требованиями и отправьте файл.",
        }
    }

    pub fn album_guidelines(&self) -> &'static str {
        match self {
            Lang::En => "📋 <b>Guidelines</b>\n\n\
                • Photos, images sent as files, or PDF documents\n\
                • Send images as files to keep the original quality\n\
                • Videos are not accepted\n\
                • You may add a caption to each file",
            Lang::Ru => "📋 <b>Требования</b>\n\n\
                • Фото, изображения файлом или PDF-документы\n\
                • Отправляйте изображения файлом, чтобы сохранить качество\n\
                • Видео не принимаются\n\
                • К каждому файлу можно добавить подпись",
        }
    }

    pub fn btn_album_guidelines(&self) -> &'static str {
        match self {
            Lang::En => "📋 Guidelines",
            Lang::Ru => "📋 Требования",
        }
    }

    pub fn btn_send_album_file(&self) -> &'static str {
        match self {
            Lang::En => "📤 Send a file",
            Lang::Ru => "📤 Отправить файл",
        }
    }

    pub fn album_awaiting_file(&self) -> &'static str {
        match self {
            Lang::En => "📤 Send your photo, image file or PDF now. Use /start to go back to the menu.",
            Lang::Ru => "📤 Отправьте фото, изображение файлом или PDF. Чтобы вернуться в меню, используйте /start.",
        }
    }

    pub fn album_file_received(&self) -> &'static str {
        match self {
            Lang::En => "✅ File received, thank you! You can send more files or use /start to go back.",
            Lang::Ru => "✅ Файл получен, спасибо! Можно отправить ещё или вернуться через /start.",
        }
    }

    pub fn album_file_error(&self) -> &'static str {
        match self {
            Lang::En => "⚠️ Only photos, image files and PDF documents are accepted.",
            Lang::Ru => "⚠️ Принимаются только фото, изображения и PDF-документы.",
        }
    }
}
