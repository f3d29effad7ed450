//! `ICMSTot` computation.

use rust_decimal::Decimal;

use crate::core::{DfeError, Numeric, XmlWriter, parse_decimal, render_decimal};

use super::types::{NfeItem, TotalOverrides};

/// `ICMSTot` children in layout order.
pub const ICMS_TOT_FIELDS: [&str; 23] = [
    "vBC",
    "vICMS",
    "vICMSDeson",
    "vFCPUFDest",
    "vICMSUFDest",
    "vICMSUFRemet",
    "vFCP",
    "vBCST",
    "vST",
    "vFCPST",
    "vFCPSTRet",
    "vProd",
    "vFrete",
    "vSeg",
    "vDesc",
    "vII",
    "vIPI",
    "vIPIDevol",
    "vPIS",
    "vCOFINS",
    "vOutro",
    "vNF",
    "vTotTrib",
];

/// The 23 invoice totals, in layout order.
#[derive(Debug, Clone, PartialEq)]
pub struct IcmsTotals {
    values: [Decimal; 23],
}

impl IcmsTotals {
    /// Value of a total by tag.
    pub fn get(&self, tag: &str) -> Option<Decimal> {
        position(tag).map(|i| self.values[i])
    }

    /// `(tag, value)` pairs in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Decimal)> + '_ {
        ICMS_TOT_FIELDS.iter().copied().zip(self.values.iter().copied())
    }

    fn set(&mut self, tag: &str, value: Decimal) -> bool {
        match position(tag) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// Write `<total><ICMSTot>...</ICMSTot></total>` with two decimals each.
    pub fn write(&self, w: &mut XmlWriter) -> Result<(), DfeError> {
        w.start_element("total")?;
        w.start_element("ICMSTot")?;
        for (tag, value) in self.iter() {
            w.text_element(tag, &render_decimal(value, 2)?)?;
        }
        w.end_element("ICMSTot")?;
        w.end_element("total")?;
        Ok(())
    }
}

fn position(tag: &str) -> Option<usize> {
    ICMS_TOT_FIELDS.iter().position(|t| *t == tag)
}

/// Compute the totals of `items`, then apply `overrides`.
///
/// Product, freight, insurance, discount and other-expense totals are item
/// sums; `vNF = vProd - vDesc + vFrete + vSeg + vOutro`; `vTotTrib` sums the
/// items' `imposto.vTotTrib`. Every other total is zero unless overridden.
/// Override keys that are not `ICMSTot` tags are ignored. Negative item
/// amounts and a negative computed `vNF` are format errors.
pub fn compute_totals(
    items: &[NfeItem],
    overrides: Option<&TotalOverrides>,
) -> Result<IcmsTotals, DfeError> {
    let mut totals = IcmsTotals {
        values: [Decimal::ZERO; 23],
    };

    let v_prod = sum(items, "vProd", |i| i.product.total.as_ref())?;
    let v_frete = sum(items, "vFrete", |i| i.product.freight.as_ref())?;
    let v_seg = sum(items, "vSeg", |i| i.product.insurance.as_ref())?;
    let v_desc = sum(items, "vDesc", |i| i.product.discount.as_ref())?;
    let v_outro = sum(items, "vOutro", |i| i.product.other.as_ref())?;
    let v_tot_trib = sum(items, "vTotTrib", |i| i.taxes.approximate_total.as_ref())?;

    totals.set("vProd", v_prod);
    totals.set("vFrete", v_frete);
    totals.set("vSeg", v_seg);
    totals.set("vDesc", v_desc);
    totals.set("vOutro", v_outro);
    let v_nf = v_prod
        .checked_sub(v_desc)
        .and_then(|v| v.checked_add(v_frete))
        .and_then(|v| v.checked_add(v_seg))
        .and_then(|v| v.checked_add(v_outro))
        .ok_or_else(|| DfeError::Format("vNF: amount out of range".into()))?;
    if v_nf.is_sign_negative() && !v_nf.is_zero() {
        return Err(DfeError::Format(format!(
            "vNF: discounts exceed the invoice total ({v_nf})"
        )));
    }
    totals.set("vNF", v_nf);
    totals.set("vTotTrib", v_tot_trib);

    for (tag, value) in overrides.into_iter().flatten() {
        let parsed = parse_decimal(value)
            .map_err(|e| DfeError::Format(format!("totalOverrides.{tag}: {e}")))?;
        if !totals.set(tag, parsed) {
            tracing::warn!(tag = %tag, "ignoring unknown total override");
        }
    }

    Ok(totals)
}

fn sum<'a>(
    items: &'a [NfeItem],
    tag: &str,
    field: impl Fn(&'a NfeItem) -> Option<&'a Numeric>,
) -> Result<Decimal, DfeError> {
    items.iter().enumerate().try_fold(Decimal::ZERO, |acc, (index, item)| {
        let Some(value) = field(item) else {
            return Ok(acc);
        };
        let parsed = parse_decimal(value)
            .map_err(|e| DfeError::Format(format!("items[{index}].{tag}: {e}")))?;
        if parsed.is_sign_negative() && !parsed.is_zero() {
            return Err(DfeError::Format(format!(
                "items[{index}].{tag}: must not be negative"
            )));
        }
        acc.checked_add(parsed).ok_or_else(|| {
            DfeError::Format(format!("items[{index}].{tag}: amount out of range"))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfe::types::{ItemTaxes, Product};
    use rust_decimal_macros::dec;

    fn item(v_prod: &str) -> NfeItem {
        NfeItem {
            product: Product {
                total: Some(v_prod.into()),
                ..Default::default()
            },
            taxes: ItemTaxes::default(),
        }
    }

    #[test]
    fn sums_items() {
        let mut a = item("100.00");
        a.product.discount = Some("10".into());
        a.product.freight = Some(Numeric::Number(5.5));
        let mut b = item("50,25");
        b.product.insurance = Some("1".into());
        b.product.other = Some("0.75".into());
        b.taxes.approximate_total = Some("12.34".into());

        let totals = compute_totals(&[a, b], None).unwrap();
        assert_eq!(totals.get("vProd"), Some(dec!(150.25)));
        assert_eq!(totals.get("vDesc"), Some(dec!(10)));
        assert_eq!(totals.get("vFrete"), Some(dec!(5.5)));
        assert_eq!(totals.get("vNF"), Some(dec!(147.50)));
        assert_eq!(totals.get("vTotTrib"), Some(dec!(12.34)));
        assert_eq!(totals.get("vICMS"), Some(Decimal::ZERO));
    }

    #[test]
    fn overrides_replace_computed_values() {
        let overrides: TotalOverrides = [
            ("vICMS".to_string(), Numeric::from("18")),
            ("vNF".to_string(), Numeric::from("99.99")),
        ]
        .into_iter()
        .collect();
        let totals = compute_totals(&[item("100")], Some(&overrides)).unwrap();
        assert_eq!(totals.get("vICMS"), Some(dec!(18)));
        assert_eq!(totals.get("vNF"), Some(dec!(99.99)));
        assert_eq!(totals.get("vProd"), Some(dec!(100)));
    }

    #[test]
    fn unknown_override_is_ignored() {
        let overrides: TotalOverrides = [("vBogus".to_string(), Numeric::from("1"))]
            .into_iter()
            .collect();
        let totals = compute_totals(&[item("1")], Some(&overrides)).unwrap();
        assert_eq!(totals.iter().count(), 23);
        assert_eq!(totals.get("vBogus"), None);
    }

    #[test]
    fn unparseable_item_value_names_the_item() {
        let err = compute_totals(&[item("1"), item("abc")], None).unwrap_err();
        assert!(matches!(err, DfeError::Format(ref m) if m.starts_with("items[1].vProd")));
    }

    #[test]
    fn overflowing_item_sum_is_a_format_error() {
        let huge = "70000000000000000000000000000";
        let err = compute_totals(&[item(huge), item(huge)], None).unwrap_err();
        assert!(
            matches!(err, DfeError::Format(ref m) if m == "items[1].vProd: amount out of range"),
            "{err}"
        );
    }

    #[test]
    fn overflowing_invoice_total_is_a_format_error() {
        let mut a = item("70000000000000000000000000000");
        a.product.freight = Some("70000000000000000000000000000".into());
        let err = compute_totals(&[a], None).unwrap_err();
        assert!(matches!(err, DfeError::Format(ref m) if m.starts_with("vNF")), "{err}");
    }

    #[test]
    fn negative_item_amount_is_rejected() {
        let mut a = item("10");
        a.product.discount = Some("-1".into());
        let err = compute_totals(&[a], None).unwrap_err();
        assert!(
            matches!(err, DfeError::Format(ref m) if m == "items[0].vDesc: must not be negative"),
            "{err}"
        );
    }

    #[test]
    fn discount_above_total_is_rejected() {
        let mut a = item("10");
        a.product.discount = Some("10.01".into());
        let err = compute_totals(&[a], None).unwrap_err();
        assert!(matches!(err, DfeError::Format(ref m) if m.starts_with("vNF:")), "{err}");

        let mut b = item("10");
        b.product.discount = Some("10".into());
        let totals = compute_totals(&[b], None).unwrap();
        assert_eq!(totals.get("vNF"), Some(Decimal::ZERO));
    }

    #[test]
    fn totals_too_wide_for_two_decimals_fail_to_render() {
        let totals = compute_totals(&[item("70000000000000000000000000000")], None).unwrap();
        let mut w = XmlWriter::fragment();
        assert!(matches!(totals.write(&mut w), Err(DfeError::Format(_))));
    }

    #[test]
    fn renders_fixed_order() {
        let totals = compute_totals(&[item("100.00")], None).unwrap();
        let mut w = XmlWriter::fragment();
        totals.write(&mut w).unwrap();
        let xml = w.into_string().unwrap();
        assert!(xml.starts_with("<total><ICMSTot><vBC>0.00</vBC><vICMS>0.00</vICMS>"));
        assert!(xml.contains("<vProd>100.00</vProd>"));
        assert!(xml.ends_with("<vNF>100.00</vNF><vTotTrib>0.00</vTotTrib></ICMSTot></total>"));
    }
}
