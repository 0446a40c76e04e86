mod inspection;
mod signature;

pub use inspection::{
    FinalizeUpdate, GeneralFields, InspectionRecord, NewInspection, StatutEtatDesLieux, TypeBien,
    TypeEtatDesLieux,
};
pub use signature::{Signature, SignatureParty};
