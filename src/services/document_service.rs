// src/services/document_service.rs

use genpdf::{Alignment, Element, Scale, elements, style};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    common::format::{format_currency, format_date},
    config::{CompanyProfile, RenderConfig},
    models::documents::{DocumentKind, FinancialRecord, RenderedDocument},
    models::totals::{BalanceTotals, DerivedTotals, TradeTotals},
};

/// Seam de renderização que o orquestrador enxerga.
pub trait DocumentRenderer: Send + Sync {
    fn render(
        &self,
        record: &FinancialRecord,
        totals: &DerivedTotals,
    ) -> Result<RenderedDocument, AppError>;
}

#[derive(Clone)]
pub struct DocumentService {
    company: CompanyProfile,
    render: RenderConfig,
}

impl DocumentRenderer for DocumentService {
    /// Renderiza o documento inteiro em memória, numa passada só. Nenhum
    /// estado sobrevive entre documentos: cada chamada monta tudo do zero
    /// a partir do registro + totais + config.
    fn render(
        &self,
        record: &FinancialRecord,
        totals: &DerivedTotals,
    ) -> Result<RenderedDocument, AppError> {
        // Carrega a fonte da pasta configurada (Regular/Bold/Italic/BoldItalic).
        // Fonte não é adorno: sem ela não existe documento.
        let font_family =
            genpdf::fonts::from_files(&self.render.font_dir, &self.render.font_name, None)
                .map_err(|_| {
                    AppError::FontNotFound(format!(
                        "fonte '{}' não encontrada em {}",
                        self.render.font_name,
                        self.render.font_dir.display()
                    ))
                })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_paper_size(genpdf::PaperSize::A4);
        doc.set_title(format!(
            "{} #{}",
            record.kind().title(),
            record.document_number()
        ));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(self.render.margins_mm);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO DA EMPRESA ---
        self.push_logo(&mut doc);
        doc.push(
            elements::Paragraph::new(self.company.name.as_str())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        if let Some(doc_num) = &self.company.document_number {
            doc.push(
                elements::Paragraph::new(format!("CNPJ/CPF: {}", doc_num))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }
        if let Some(phone) = &self.company.phone {
            doc.push(
                elements::Paragraph::new(format!("Fone: {}", phone))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }

        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(record.kind().title())
                .styled(style::Style::new().bold().with_font_size(14)),
        );

        self.push_party_block(&mut doc, record);
        self.push_meta_block(&mut doc, record);

        doc.push(elements::Break::new(2));

        // --- CORPO + RESUMO ---
        match (record, totals) {
            (FinancialRecord::Invoice { items, paid_amount, .. }, DerivedTotals::Trade(t)) => {
                self.push_invoice_table(&mut doc, items, t);
                doc.push(elements::Break::new(2));
                self.push_invoice_summary(&mut doc, t, *paid_amount);
                doc.push(elements::Break::new(2));
                self.push_pix_block(&mut doc);
            }
            (FinancialRecord::ReturnInvoice { items, .. }, DerivedTotals::Trade(t)) => {
                self.push_return_table(&mut doc, items, t);
                doc.push(elements::Break::new(2));
                self.push_return_summary(&mut doc, t);
            }
            (FinancialRecord::BalanceSnapshot { bank_balance, customers_owe_us, we_owe_customers, suppliers_owe_us, we_owe_suppliers, .. }, DerivedTotals::Balance(b)) => {
                self.push_balance_sections(
                    &mut doc,
                    *bank_balance,
                    *customers_owe_us,
                    *we_owe_customers,
                    *suppliers_owe_us,
                    *we_owe_suppliers,
                    b,
                );
            }
            _ => {
                return Err(AppError::RenderFailure(
                    "totais não correspondem ao tipo do documento".to_string(),
                ));
            }
        }

        self.push_signature_block(&mut doc, record.kind());
        self.push_footer(&mut doc, record);

        // Renderiza para buffer (memória); quem grava em disco é o sink.
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::RenderFailure(e.to_string()))?;

        Ok(RenderedDocument {
            kind: record.kind(),
            document_number: record.document_number(),
            bytes: buffer,
        })
    }
}

impl DocumentService {
    pub fn new(company: CompanyProfile, render: RenderConfig) -> Self {
        Self { company, render }
    }

    fn money(&self, value: Decimal) -> String {
        format_currency(value, &self.render.currency_symbol)
    }

    fn push_logo(&self, doc: &mut genpdf::Document) {
        if !self.render.show_logo {
            return;
        }
        let Some(path) = &self.render.logo_path else {
            return;
        };
        match elements::Image::from_path(path) {
            Ok(img) => doc.push(img.with_scale(Scale::new(0.35, 0.35))),
            // Adorno opcional: sem o arquivo, o documento sai do mesmo jeito.
            Err(e) => tracing::warn!("Logo indisponível em {}: {}", path.display(), e),
        }
    }

    fn push_party_block(&self, doc: &mut genpdf::Document, record: &FinancialRecord) {
        match record {
            FinancialRecord::Invoice {
                party_name,
                party_address,
                ..
            } => {
                doc.push(elements::Paragraph::new(format!("Cliente: {}", party_name)));
                if !party_address.is_empty() {
                    doc.push(elements::Paragraph::new(format!(
                        "Endereço: {}",
                        party_address
                    )));
                }
            }
            FinancialRecord::ReturnInvoice { party_name, .. } => {
                doc.push(elements::Paragraph::new(format!("Cliente: {}", party_name)));
            }
            // Balanço é documento interno, não tem contraparte.
            FinancialRecord::BalanceSnapshot { .. } => {}
        }
    }

    // Bloco de metadados em duas colunas: número, data e referência cruzada.
    fn push_meta_block(&self, doc: &mut genpdf::Document, record: &FinancialRecord) {
        let mut table = elements::TableLayout::new(vec![1, 1]);

        match record {
            FinancialRecord::Invoice { .. } => {
                table
                    .row()
                    .element(elements::Paragraph::new(format!(
                        "Documento Nº: {}",
                        record.document_number()
                    )))
                    .element(elements::Paragraph::new(format!(
                        "Data: {}",
                        format_date(record.date())
                    )))
                    .push()
                    .expect("Erro na tabela de metadados");
            }
            FinancialRecord::ReturnInvoice {
                original_document_number,
                ..
            } => {
                table
                    .row()
                    .element(elements::Paragraph::new(format!(
                        "Documento Nº: {}",
                        record.document_number()
                    )))
                    .element(elements::Paragraph::new(format!(
                        "Data: {}",
                        format_date(record.date())
                    )))
                    .push()
                    .expect("Erro na tabela de metadados");
                table
                    .row()
                    .element(elements::Paragraph::new(format!(
                        "Fatura de origem: Nº {}",
                        original_document_number
                    )))
                    .element(elements::Paragraph::new(""))
                    .push()
                    .expect("Erro na tabela de metadados");
            }
            FinancialRecord::BalanceSnapshot { .. } => {
                table
                    .row()
                    .element(elements::Paragraph::new(format!(
                        "Posição em: {}",
                        format_date(record.date())
                    )))
                    .element(elements::Paragraph::new(""))
                    .push()
                    .expect("Erro na tabela de metadados");
            }
        }

        doc.push(table);
    }

    // --- TABELA DE ITENS (FATURA) ---
    // Pesos: # (1), Descrição (5), Qtd (1), Unitário (2), Desconto (2), Líquido (2)
    fn push_invoice_table(
        &self,
        doc: &mut genpdf::Document,
        items: &[crate::models::documents::LineItem],
        totals: &TradeTotals,
    ) {
        let mut table = elements::TableLayout::new(vec![1, 5, 1, 2, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("#").styled(bold))
            .element(elements::Paragraph::new("Descrição").styled(bold))
            .element(elements::Paragraph::new("Qtd").styled(bold))
            .element(elements::Paragraph::new("Unitário").styled(bold))
            .element(elements::Paragraph::new("Desconto").styled(bold))
            .element(elements::Paragraph::new("Líquido").styled(bold))
            .push()
            .expect("Erro no cabeçalho da tabela");

        // Sem itens a tabela sai só com o cabeçalho; documento vazio não é erro.
        for (idx, (item, line)) in items.iter().zip(&totals.lines).enumerate() {
            table
                .row()
                .element(elements::Paragraph::new(format!("{}", idx + 1)))
                .element(elements::Paragraph::new(item.name.as_str()))
                .element(elements::Paragraph::new(format!("{}", item.quantity)))
                .element(elements::Paragraph::new(self.money(item.unit_price)))
                .element(elements::Paragraph::new(self.money(line.discount)))
                .element(elements::Paragraph::new(self.money(line.net)))
                .push()
                .expect("Erro na linha da tabela");
        }

        doc.push(table);
    }

    // --- TABELA DE ITENS (DEVOLUÇÃO) ---
    fn push_return_table(
        &self,
        doc: &mut genpdf::Document,
        items: &[crate::models::documents::LineItem],
        totals: &TradeTotals,
    ) {
        let mut table = elements::TableLayout::new(vec![1, 5, 2, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("#").styled(bold))
            .element(elements::Paragraph::new("Descrição").styled(bold))
            .element(elements::Paragraph::new("Qtd devolvida").styled(bold))
            .element(elements::Paragraph::new("Unitário").styled(bold))
            .element(elements::Paragraph::new("Valor devolvido").styled(bold))
            .push()
            .expect("Erro no cabeçalho da tabela");

        for (idx, (item, line)) in items.iter().zip(&totals.lines).enumerate() {
            table
                .row()
                .element(elements::Paragraph::new(format!("{}", idx + 1)))
                .element(elements::Paragraph::new(item.name.as_str()))
                .element(elements::Paragraph::new(format!("{}", item.quantity)))
                .element(elements::Paragraph::new(self.money(item.unit_price)))
                .element(elements::Paragraph::new(self.money(line.net)))
                .push()
                .expect("Erro na linha da tabela");
        }

        doc.push(table);
    }

    fn push_invoice_summary(
        &self,
        doc: &mut genpdf::Document,
        totals: &TradeTotals,
        paid_amount: Decimal,
    ) {
        self.push_total_line(doc, "Subtotal", totals.subtotal, false);
        self.push_total_line(doc, "Desconto total", totals.total_discount, false);
        self.push_total_line(doc, "Valor líquido", totals.net_amount, true);
        self.push_total_line(doc, "Saldo anterior", totals.total_balance - totals.net_amount, false);
        self.push_total_line(doc, "Saldo total", totals.total_balance, false);
        self.push_total_line(doc, "Valor pago", paid_amount, false);
        self.push_total_line(doc, "SALDO FINAL", totals.net_balance, true);
    }

    fn push_return_summary(&self, doc: &mut genpdf::Document, totals: &TradeTotals) {
        self.push_total_line(doc, "Subtotal", totals.subtotal, false);
        self.push_total_line(doc, "Desconto total", totals.total_discount, false);
        self.push_total_line(doc, "Valor devolvido", totals.net_amount, true);
        self.push_total_line(doc, "Saldo anterior", totals.total_balance + totals.net_amount, false);
        self.push_total_line(doc, "SALDO ATUAL", totals.total_balance, true);
    }

    fn push_total_line(
        &self,
        doc: &mut genpdf::Document,
        label: &str,
        value: Decimal,
        strong: bool,
    ) {
        let mut paragraph =
            elements::Paragraph::new(format!("{}: {}", label, self.money(value)));
        paragraph.set_alignment(Alignment::Right);
        if strong {
            doc.push(paragraph.styled(style::Style::new().bold().with_font_size(12)));
        } else {
            doc.push(paragraph);
        }
    }

    // Balanço não tem tabela de itens: seções com pares chave/valor.
    fn push_balance_sections(
        &self,
        doc: &mut genpdf::Document,
        bank_balance: Decimal,
        customers_owe_us: Decimal,
        we_owe_customers: Decimal,
        suppliers_owe_us: Decimal,
        we_owe_suppliers: Decimal,
        totals: &BalanceTotals,
    ) {
        self.push_section_header(doc, "ATIVOS");
        let mut assets = elements::TableLayout::new(vec![3, 2]);
        self.push_kv_row(&mut assets, "Saldo em banco", bank_balance);
        self.push_kv_row(&mut assets, "Clientes nos devem", customers_owe_us);
        self.push_kv_row(&mut assets, "Fornecedores nos devem", suppliers_owe_us);
        self.push_kv_row(&mut assets, "Total a receber", totals.total_receivables);
        self.push_kv_row(&mut assets, "Total de ativos", totals.total_assets);
        doc.push(assets);

        doc.push(elements::Break::new(1));

        self.push_section_header(doc, "PASSIVOS");
        let mut liabilities = elements::TableLayout::new(vec![3, 2]);
        self.push_kv_row(&mut liabilities, "Devemos a clientes", we_owe_customers);
        self.push_kv_row(&mut liabilities, "Devemos a fornecedores", we_owe_suppliers);
        self.push_kv_row(&mut liabilities, "Total a pagar", totals.total_payables);
        doc.push(liabilities);

        doc.push(elements::Break::new(2));
        self.push_total_line(doc, "PATRIMÔNIO LÍQUIDO", totals.net_worth, true);
    }

    fn push_section_header(&self, doc: &mut genpdf::Document, title: &str) {
        doc.push(
            elements::Paragraph::new(title).styled(style::Style::new().bold().with_font_size(12)),
        );
    }

    fn push_kv_row(&self, table: &mut elements::TableLayout, label: &str, value: Decimal) {
        let mut amount = elements::Paragraph::new(self.money(value));
        amount.set_alignment(Alignment::Right);
        table
            .row()
            .element(elements::Paragraph::new(label))
            .element(amount)
            .push()
            .expect("Erro na linha de balanço");
    }

    // --- ÁREA DE PAGAMENTO (QR CODE) ---
    fn push_pix_block(&self, doc: &mut genpdf::Document) {
        let Some(key) = self.company.pix_key.as_deref() else {
            return;
        };

        doc.push(
            elements::Paragraph::new("PAGAMENTO VIA PIX")
                .styled(style::Style::new().bold().with_font_size(12)),
        );
        doc.push(elements::Paragraph::new(format!("Chave: {}", key)));
        doc.push(elements::Break::new(1));

        // QR Code simples da string da chave. Para o "Pix Copia e Cola"
        // oficial (EMV BR Code) precisaríamos de uma lib de payload Pix.
        let code = match QrCode::new(key.as_bytes()) {
            Ok(code) => code,
            Err(e) => {
                // Adorno opcional, mesma regra do logo.
                tracing::warn!("QR Code da chave PIX indisponível: {}", e);
                return;
            }
        };
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);
        match elements::Image::from_dynamic_image(dynamic_image) {
            Ok(pdf_image) => doc.push(pdf_image.with_scale(Scale::new(0.5, 0.5))),
            Err(e) => tracing::warn!("QR Code da chave PIX indisponível: {}", e),
        }
    }

    // Duas linhas de assinatura lado a lado.
    fn push_signature_block(&self, doc: &mut genpdf::Document, kind: DocumentKind) {
        let (left, right) = match kind {
            DocumentKind::BalanceSheet => ("Conferido por", "Aprovado por"),
            _ => ("Assinatura do cliente", "Assinatura do responsável"),
        };

        doc.push(elements::Break::new(3));

        let mut table = elements::TableLayout::new(vec![1, 1]);
        let mut line_left = elements::Paragraph::new("_______________________________");
        line_left.set_alignment(Alignment::Center);
        let mut line_right = elements::Paragraph::new("_______________________________");
        line_right.set_alignment(Alignment::Center);
        table
            .row()
            .element(line_left)
            .element(line_right)
            .push()
            .expect("Erro no bloco de assinaturas");

        let mut label_left = elements::Paragraph::new(left);
        label_left.set_alignment(Alignment::Center);
        let mut label_right = elements::Paragraph::new(right);
        label_right.set_alignment(Alignment::Center);
        table
            .row()
            .element(label_left)
            .element(label_right)
            .push()
            .expect("Erro no bloco de assinaturas");

        doc.push(table);
    }

    // --- RODAPÉ ---
    fn push_footer(&self, doc: &mut genpdf::Document, record: &FinancialRecord) {
        let remark = match record.kind() {
            DocumentKind::Invoice => "Obrigado pela preferência!",
            DocumentKind::Return => "Confira os valores devolvidos com o canhoto da fatura de origem.",
            DocumentKind::BalanceSheet => "Relatório interno, sem valor fiscal.",
        };

        doc.push(elements::Break::new(2));
        let mut closing = elements::Paragraph::new(remark);
        closing.set_alignment(Alignment::Center);
        doc.push(closing.styled(style::Style::new().italic().with_font_size(9)));

        if let Some(addr) = &self.company.address {
            doc.push(
                elements::Paragraph::new(addr.as_str())
                    .styled(style::Style::new().italic().with_font_size(8)),
            );
        }
    }
}
