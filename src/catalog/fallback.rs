//! Built-in catalog served when the store has no products yet.

use rust_decimal::Decimal;

use crate::domain::aggregates::Product;

const SUN_CARE: &str = "Fotoprotección";
const HAIR_CARE: &str = "Cuidado del cabello";
const MOTHER_BABY: &str = "Mamá & Bebé";
const VITAMINS: &str = "Vitaminas";

fn soles(cents: i64) -> Decimal { Decimal::new(cents, 2) }

fn item(id: i64, name: &str, description: &str, cents: i64, category: &str, stock: i32) -> Product {
    Product::new(id, name, soles(cents)).with_description(description).with_category(category).with_stock(stock)
}

/// The fifteen house products, ordered by id. Every `on_sale` flag starts false;
/// the monthly selection decides which are featured.
pub fn fallback_catalog() -> Vec<Product> {
    vec![
        item(1, "Protector Solar SPF 50+", "Protección solar de amplio espectro para todo tipo de piel", 2550, SUN_CARE, 100),
        item(2, "Shampoo Anticaspa", "Shampoo especializado para el control de la caspa y cuidado del cuero cabelludo", 1875, HAIR_CARE, 80)
            .with_original_price(soles(2250)),
        item(3, "Pañales Talla M", "Pañales ultra absorbentes para bebés de 4-9 kg", 3500, MOTHER_BABY, 50),
        item(4, "Vitamina C 1000mg", "Suplemento vitamínico para fortalecer el sistema inmunológico", 3000, VITAMINS, 60),
        item(5, "Crema Hidratante Facial", "Crema hidratante con ácido hialurónico para piel seca", 2890, SUN_CARE, 45)
            .with_original_price(soles(3500)),
        item(6, "Acondicionador Reparador", "Acondicionador para cabello dañado con queratina", 2200, HAIR_CARE, 70),
        item(7, "Leche de Fórmula 1", "Fórmula láctea para bebés de 0-6 meses", 4500, MOTHER_BABY, 30),
        item(8, "Multivitamínico Completo", "Complejo vitamínico con 12 vitaminas esenciales", 4250, VITAMINS, 40)
            .with_original_price(soles(5000)),
        item(9, "Bloqueador Solar Facial SPF 30", "Protector solar específico para el rostro con textura ligera", 3200, SUN_CARE, 55),
        item(10, "Tratamiento Capilar Nutritivo", "Mascarilla intensiva para cabello seco y maltratado", 2850, HAIR_CARE, 40)
            .with_original_price(soles(3500)),
        item(11, "Toallitas Húmedas para Bebé", "Toallitas suaves con aloe vera para el cuidado del bebé", 1250, MOTHER_BABY, 200),
        item(12, "Crema para Pañalitis", "Crema protectora y reparadora con óxido de zinc", 1800, MOTHER_BABY, 85),
        item(13, "Omega 3 Premium", "Suplemento de ácidos grasos omega 3 para la salud cardiovascular", 5500, VITAMINS, 60)
            .with_original_price(soles(6500)),
        item(14, "After Sun Reparador", "Loción calmante y refrescante para después de la exposición solar", 2490, SUN_CARE, 48),
        item(15, "Serum Capilar Fortificante", "Tratamiento intensivo para prevenir la caída del cabello", 3800, HAIR_CARE, 35),
    ]
}
