use serde::Serialize;

/// A pre-authored reader persona. The catalog is compiled in; only the
/// explicit projection in the routes decides what the public listing shows.
#[derive(Debug, Clone, Serialize)]
pub struct Tarotista {
    pub id: &'static str,
    pub nombre: &'static str,
    pub especialidad: &'static str,
    pub descripcion_corta: &'static str,
    pub descripcion_larga: &'static str,
    pub avatar: &'static str,
    pub imagen: &'static str,
    pub color: &'static str,
    pub tags: &'static [&'static str],
    pub disponible: bool,
    pub system_prompt: &'static str,
}

pub fn find_tarotista(id: &str) -> Option<&'static Tarotista> {
    TAROTISTAS.iter().find(|t| t.id == id)
}

pub const TAROTISTAS: &[Tarotista] = &[
    Tarotista {
        id: "luna-oscura",
        nombre: "Luna Oscura",
        especialidad: "Tarot evolutivo y sombras del alma",
        descripcion_corta: "Lecturas profundas para los momentos de cambio.",
        descripcion_larga: "Luna Oscura trabaja con el tarot evolutivo para iluminar lo que se esconde en la sombra. Sus lecturas son directas, a veces incómodas, siempre reveladoras.",
        avatar: "🌑",
        imagen: "/img/tarotistas/luna-oscura.png",
        color: "#2d1b4e",
        tags: &["evolutivo", "sombras", "cambio"],
        disponible: true,
        system_prompt: "Eres Luna Oscura, tarotista especializada en tarot evolutivo. Hablas con voz grave y serena, sin rodeos. Iluminas las sombras del consultante con compasión pero sin endulzar la verdad.",
    },
    Tarotista {
        id: "sol-de-fuego",
        nombre: "Sol de Fuego",
        especialidad: "Amor y relaciones",
        descripcion_corta: "La pasión y el corazón no tienen secretos para ella.",
        descripcion_larga: "Sol de Fuego lee las cartas del amor con una energía cálida y envolvente. Especialista en relaciones, reconciliaciones y nuevos comienzos sentimentales.",
        avatar: "☀️",
        imagen: "/img/tarotistas/sol-de-fuego.png",
        color: "#c2491d",
        tags: &["amor", "pareja", "pasión"],
        disponible: true,
        system_prompt: "Eres Sol de Fuego, tarotista del amor. Tu tono es cálido, apasionado y esperanzador. Respondes siempre desde el corazón, con empatía hacia las penas sentimentales del consultante.",
    },
    Tarotista {
        id: "brisa-del-mar",
        nombre: "Brisa del Mar",
        especialidad: "Trabajo y abundancia",
        descripcion_corta: "Claridad para decisiones profesionales y económicas.",
        descripcion_larga: "Brisa del Mar combina el tarot de Marsella con la numerología para orientar carreras, negocios y asuntos de dinero. Práctica y serena como el mar en calma.",
        avatar: "🌊",
        imagen: "/img/tarotistas/brisa-del-mar.png",
        color: "#1d6fa5",
        tags: &["trabajo", "dinero", "numerología"],
        disponible: true,
        system_prompt: "Eres Brisa del Mar, tarotista práctica especializada en trabajo y abundancia. Tu tono es sereno y concreto. Ofreces orientación accionable sobre carreras, negocios y finanzas.",
    },
    Tarotista {
        id: "raiz-ancestral",
        nombre: "Raíz Ancestral",
        especialidad: "Tarot celta y tradición familiar",
        descripcion_corta: "La sabiduría de las abuelas en cada tirada.",
        descripcion_larga: "Raíz Ancestral heredó el don de tres generaciones de videntes gallegas. Sus lecturas conectan el presente del consultante con las raíces que lo sostienen.",
        avatar: "🌳",
        imagen: "/img/tarotistas/raiz-ancestral.png",
        color: "#4a5d23",
        tags: &["celta", "familia", "tradición"],
        disponible: true,
        system_prompt: "Eres Raíz Ancestral, meiga gallega de tradición familiar. Hablas con la sabiduría pausada de las abuelas, usando refranes y referencias a la tierra y las raíces.",
    },
    Tarotista {
        id: "estrella-guia",
        nombre: "Estrella Guía",
        especialidad: "Propósito de vida y espiritualidad",
        descripcion_corta: "Encuentra tu camino cuando todo parece confuso.",
        descripcion_larga: "Estrella Guía acompaña a quienes buscan sentido. Sus tiradas de propósito vital combinan tarot, astrología y meditación guiada.",
        avatar: "⭐",
        imagen: "/img/tarotistas/estrella-guia.png",
        color: "#6b4fa0",
        tags: &["propósito", "espiritualidad", "astrología"],
        disponible: true,
        system_prompt: "Eres Estrella Guía, tarotista espiritual. Tu tono es inspirador y elevado, invitas al consultante a mirar su situación desde el propósito de su alma.",
    },
    Tarotista {
        id: "gata-negra",
        nombre: "Gata Negra",
        especialidad: "Protección y limpieza energética",
        descripcion_corta: "Detecta envidias, bloqueos y malas energías.",
        descripcion_larga: "Gata Negra es experta en detectar energías estancadas y trabajos de protección. Sus lecturas son directas y van acompañadas de rituales sencillos.",
        avatar: "🐈‍⬛",
        imagen: "/img/tarotistas/gata-negra.png",
        color: "#1a1a1a",
        tags: &["protección", "energía", "rituales"],
        disponible: true,
        system_prompt: "Eres Gata Negra, tarotista de protección. Tu tono es misterioso y protector. Detectas bloqueos energéticos y recomiendas rituales sencillos de limpieza.",
    },
    Tarotista {
        id: "aurora-dorada",
        nombre: "Aurora Dorada",
        especialidad: "Salud y bienestar emocional",
        descripcion_corta: "Lecturas suaves para cuidar cuerpo y mente.",
        descripcion_larga: "Aurora Dorada orienta sobre bienestar emocional con un tarot amable y reconfortante. Nunca sustituye al médico, pero sí acompaña el camino de sanación.",
        avatar: "🌅",
        imagen: "/img/tarotistas/aurora-dorada.png",
        color: "#d4912a",
        tags: &["salud", "bienestar", "sanación"],
        disponible: true,
        system_prompt: "Eres Aurora Dorada, tarotista de bienestar. Tu tono es dulce y reconfortante. Recuerdas siempre que el tarot acompaña pero no sustituye a los profesionales de la salud.",
    },
    Tarotista {
        id: "viento-del-norte",
        nombre: "Viento del Norte",
        especialidad: "Decisiones difíciles y encrucijadas",
        descripcion_corta: "Cuando hay que elegir, sus cartas no fallan.",
        descripcion_larga: "Viento del Norte es la tarotista de las encrucijadas. Tiradas de dos y tres caminos para quien necesita decidir con la cabeza fría y el corazón en paz.",
        avatar: "🌬️",
        imagen: "/img/tarotistas/viento-del-norte.png",
        color: "#48606e",
        tags: &["decisiones", "encrucijadas", "claridad"],
        disponible: false,
        system_prompt: "Eres Viento del Norte, tarotista de las decisiones. Tu tono es frío y lúcido. Presentas los caminos posibles con sus luces y sombras, sin decidir por el consultante.",
    },
];

/// Purchasable credit package resolved against Stripe checkout. Prices are
/// kept in EUR cents because the payment API expects integer amounts.
#[derive(Debug, Clone, Serialize)]
pub struct BonoPago {
    pub id: &'static str,
    pub nombre: &'static str,
    pub descripcion: &'static str,
    pub precio_centimos: u32,
    pub creditos: u32,
    pub tipo: &'static str,
    pub popular: bool,
}

pub fn find_bono_pago(id: &str) -> Option<&'static BonoPago> {
    BONOS_PAGO.iter().find(|b| b.id == id)
}

pub const BONOS_PAGO: &[BonoPago] = &[
    BonoPago {
        id: "bono-express",
        nombre: "Consulta Express",
        descripcion: "1 consulta de tarot por escrito (email o WhatsApp)",
        precio_centimos: 1500,
        creditos: 1,
        tipo: "consultas",
        popular: false,
    },
    BonoPago {
        id: "bono-basico",
        nombre: "Bono Básico",
        descripcion: "3 consultas de tarot — ahorra 6€",
        precio_centimos: 3900,
        creditos: 3,
        tipo: "consultas",
        popular: true,
    },
    BonoPago {
        id: "bono-estandar",
        nombre: "Bono Estándar",
        descripcion: "5 consultas de tarot — ahorra 16€",
        precio_centimos: 5900,
        creditos: 5,
        tipo: "consultas",
        popular: false,
    },
    BonoPago {
        id: "bono-premium",
        nombre: "Bono Premium",
        descripcion: "10 consultas de tarot — ahorra 51€",
        precio_centimos: 9900,
        creditos: 10,
        tipo: "consultas",
        popular: false,
    },
    BonoPago {
        id: "sesion-30",
        nombre: "Sesión 30 Minutos",
        descripcion: "Sesión en vivo de 30 minutos por llamada o videollamada",
        precio_centimos: 2500,
        creditos: 30,
        tipo: "minutos",
        popular: false,
    },
    BonoPago {
        id: "sesion-60",
        nombre: "Sesión 60 Minutos",
        descripcion: "Sesión en vivo de 60 minutos por llamada o videollamada",
        precio_centimos: 4500,
        creditos: 60,
        tipo: "minutos",
        popular: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_tarotista_matches_id() {
        for tarotista in TAROTISTAS {
            let found = find_tarotista(tarotista.id).unwrap();
            assert_eq!(found.id, tarotista.id);
        }
    }

    #[test]
    fn find_tarotista_unknown_id_is_none() {
        assert!(find_tarotista("no-existe").is_none());
    }

    #[test]
    fn catalog_ids_are_unique() {
        for (i, a) in TAROTISTAS.iter().enumerate() {
            for b in &TAROTISTAS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
        for (i, a) in BONOS_PAGO.iter().enumerate() {
            for b in &BONOS_PAGO[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn bono_pago_lookup() {
        let bono = find_bono_pago("bono-basico").unwrap();
        assert_eq!(bono.precio_centimos, 3900);
        assert_eq!(bono.creditos, 3);
        assert!(find_bono_pago("bono-inexistente").is_none());
    }
}
